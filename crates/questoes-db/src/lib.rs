//! Storage for extracted questions and professor-assembled simulados
//!
//! Two backends share the [`QuestionStore`] / [`SimuladoStore`] traits:
//! [`PgStore`] talks to PostgreSQL through sqlx, [`MemoryStore`] keeps rows in
//! process for tests and dry runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{
    NewQuestion, NewSimulado, QuestionFilter, Simulado, StoredQuestion, UncategorizedPage,
};
pub use postgres::PgStore;
pub use store::{QuestionStore, SimuladoStore, Store};
