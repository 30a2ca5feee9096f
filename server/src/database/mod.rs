pub mod create;
pub mod pokedex;
pub mod trainers;

pub use create::{connect, connect_in_memory};
pub use pokedex::{PokedexDb, Pokemon};
pub use trainers::{Trainer, TrainerDb};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::UniqueViolation(db.message().to_string())
            }
            _ => StoreError::Query(e.to_string()),
        }
    }
}
