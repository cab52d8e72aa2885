use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt row {id}: {reason}")]
    CorruptRow { id: Uuid, reason: String },

    #[error("Unknown question ids: {0:?}")]
    UnknownQuestions(Vec<Uuid>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
