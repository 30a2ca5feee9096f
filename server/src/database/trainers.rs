use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite};
use tracing::info;

use shared::types::Collection;

use super::StoreError;
use super::create::{connect, connect_in_memory, create_trainer_tables};

/// One trainer account.
///
/// Serialized as-is by `/api/register`, so the response carries
/// `password_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Trainer {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    /// Comma-joined creature identifiers.
    pub pokemons: String,
}

impl Trainer {
    pub fn collection(&self) -> Collection {
        Collection::parse(&self.pokemons)
    }
}

/// Credential store handle. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct TrainerDb {
    pool: Pool<Sqlite>,
}

impl TrainerDb {
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let pool = connect(path).await?;
        create_trainer_tables(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = connect_in_memory().await?;
        create_trainer_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Check if username exists
    pub async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trainer WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Trainer>, StoreError> {
        let trainer = sqlx::query_as::<_, Trainer>(
            "SELECT id, username, password_hash, pokemons FROM trainer WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(trainer)
    }

    /// Insert a trainer with an empty collection.
    ///
    /// The id is one more than the current maximum (1 for an empty store).
    /// It is computed inside the INSERT so two concurrent registrations
    /// cannot both claim it.
    pub async fn register(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Trainer, StoreError> {
        let id = sqlx::query(
            "INSERT INTO trainer (id, username, password_hash, pokemons)
             SELECT COALESCE(MAX(id), 0) + 1, ?, ?, '' FROM trainer",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!("New trainer made! {} (id {})", username, id);

        Ok(Trainer {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            pokemons: String::new(),
        })
    }

    /// Overwrite a trainer's stored collection.
    pub async fn set_collection(
        &self,
        trainer_id: i64,
        collection: &Collection,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE trainer SET pokemons = ? WHERE id = ?")
            .bind(collection.to_stored())
            .bind(trainer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
