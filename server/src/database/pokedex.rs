use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite};
use tracing::info;

use shared::types::{DuplicateDexPolicy, NewPokemon};

use super::StoreError;
use super::create::{connect, connect_in_memory, create_pokedex_tables};

/// One creature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pokemon {
    pub id: i64,
    pub name: String,
    pub pokedex_number: i64,
    pub classification: String,
    pub type1: String,
    pub type2: Option<String>,
}

/// Catalog store handle. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct PokedexDb {
    pool: Pool<Sqlite>,
}

impl PokedexDb {
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let pool = connect(path).await?;
        create_pokedex_tables(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = connect_in_memory().await?;
        create_pokedex_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// All records in insertion order, optionally capped.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<Pokemon>, StoreError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(i64::from).unwrap_or(-1);
        let rows = sqlx::query_as::<_, Pokemon>(
            "SELECT id, name, pokedex_number, classification, type1, type2
             FROM pokemon ORDER BY id LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// `(id, name)` pairs for the profile page picker.
    pub async fn list_names(&self) -> Result<Vec<(i64, String)>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM pokemon ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// First record carrying `pokedex_number`. Duplicates may exist; the
    /// oldest wins.
    pub async fn get_by_dex(&self, pokedex_number: i64) -> Result<Option<Pokemon>, StoreError> {
        let row = sqlx::query_as::<_, Pokemon>(
            "SELECT id, name, pokedex_number, classification, type1, type2
             FROM pokemon WHERE pokedex_number = ? ORDER BY id LIMIT 1",
        )
        .bind(pokedex_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Look for a record that would make `new` a duplicate.
    ///
    /// [`DuplicateDexPolicy::Allow`] searches for the dex number exactly as
    /// submitted, as text. Stored dex numbers are integers and `typeof` must
    /// agree, so the search runs but never matches and repeated dex numbers
    /// get through. [`DuplicateDexPolicy::Reject`] compares integers.
    pub async fn find_duplicate(
        &self,
        new: &NewPokemon,
        policy: DuplicateDexPolicy,
    ) -> Result<Option<Pokemon>, StoreError> {
        match policy {
            DuplicateDexPolicy::Allow => self.get_by_raw_dex(&new.raw_pokedex_number).await,
            DuplicateDexPolicy::Reject => self.get_by_dex(new.pokedex_number).await,
        }
    }

    /// First record whose stored dex number has the same storage class and
    /// value as `raw`. No affinity conversion is applied to `raw`.
    async fn get_by_raw_dex(&self, raw: &str) -> Result<Option<Pokemon>, StoreError> {
        let row = sqlx::query_as::<_, Pokemon>(
            "SELECT id, name, pokedex_number, classification, type1, type2
             FROM pokemon
             WHERE typeof(pokedex_number) = typeof(?) AND pokedex_number = ?
             ORDER BY id LIMIT 1",
        )
        .bind(raw)
        .bind(raw)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert(&self, new: &NewPokemon) -> Result<Pokemon, StoreError> {
        let id = sqlx::query(
            "INSERT INTO pokemon (name, pokedex_number, classification, type1, type2)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(new.pokedex_number)
        .bind(&new.classification)
        .bind(&new.type1)
        .bind(new.type2.as_deref())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(
            "New pokemon stored! {} (#{}, id {})",
            new.name, new.pokedex_number, id
        );

        Ok(Pokemon {
            id,
            name: new.name.clone(),
            pokedex_number: new.pokedex_number,
            classification: new.classification.clone(),
            type1: new.type1.clone(),
            type2: new.type2.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pikachu(dex: i64) -> NewPokemon {
        NewPokemon {
            name: "Pikachu".into(),
            pokedex_number: dex,
            raw_pokedex_number: dex.to_string(),
            classification: "Mouse Pokémon".into(),
            type1: "electric".into(),
            type2: None,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_by_dex() {
        let db = PokedexDb::open_in_memory().await.unwrap();
        let stored = db.insert(&pikachu(25)).await.unwrap();

        let fetched = db.get_by_dex(25).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert!(db.get_by_dex(26).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn allow_policy_text_search_misses_integer_column() {
        let db = PokedexDb::open_in_memory().await.unwrap();
        db.insert(&pikachu(25)).await.unwrap();

        for raw in ["25", "025", " 25"] {
            let mut submitted = pikachu(25);
            submitted.raw_pokedex_number = raw.into();
            let dup = db
                .find_duplicate(&submitted, DuplicateDexPolicy::Allow)
                .await
                .unwrap();
            assert!(dup.is_none(), "{raw:?} should not match");
        }
    }

    #[tokio::test]
    async fn reject_policy_compares_integers() {
        let db = PokedexDb::open_in_memory().await.unwrap();
        db.insert(&pikachu(25)).await.unwrap();

        // Same integer, different text: only the integer comparison sees it.
        let mut padded = pikachu(25);
        padded.raw_pokedex_number = "025".into();
        let dup = db
            .find_duplicate(&padded, DuplicateDexPolicy::Reject)
            .await
            .unwrap();
        assert!(dup.is_some());
        assert!(
            db.find_duplicate(&padded, DuplicateDexPolicy::Allow)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_respects_limit_and_order() {
        let db = PokedexDb::open_in_memory().await.unwrap();
        for dex in 1..=5 {
            db.insert(&pikachu(dex)).await.unwrap();
        }

        let first_two = db.list(Some(2)).await.unwrap();
        assert_eq!(
            first_two.iter().map(|p| p.pokedex_number).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(db.list(None).await.unwrap().len(), 5);
        assert_eq!(db.list_names().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn duplicate_dex_numbers_can_be_stored() {
        let db = PokedexDb::open_in_memory().await.unwrap();
        let a = db.insert(&pikachu(25)).await.unwrap();
        let b = db.insert(&pikachu(25)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(db.get_by_dex(25).await.unwrap().unwrap().id, a.id);
    }
}
