//! Application state for the questões API

use std::sync::Arc;

use exam_extractor::ExamExtractor;
use questoes_db::{PgStore, Store, StoreError};

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub extractor: ExamExtractor,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            extractor: ExamExtractor::new(),
        }
    }

    /// Connects to PostgreSQL and runs migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let store = PgStore::connect(database_url, max_connections).await?;
        Ok(Self::new(Arc::new(store)))
    }
}
