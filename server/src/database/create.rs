use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};

use super::StoreError;

/// Current schema version of both stores, kept in `PRAGMA user_version`.
/// Bump this whenever a schema changes and add a migration step in
/// `apply_schema`.
const SCHEMA_VERSION: u32 = 1;

/// Open (or create) a SQLite file and return a pool over it.
pub async fn connect(path: &str) -> Result<Pool<Sqlite>, StoreError> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path))
        .map_err(|e| StoreError::Connection(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    info!("Database opened: {}", path);
    Ok(pool)
}

/// A private in-memory database. The pool is pinned to one connection that
/// never expires, since every connection would otherwise see its own empty
/// database.
pub async fn connect_in_memory() -> Result<Pool<Sqlite>, StoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))
}

/// Catalog store: one row per creature record.
pub async fn create_pokedex_tables(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    // No UNIQUE on pokedex_number: duplicates are a policy decision made by
    // the create handler.
    apply_schema(
        pool,
        "pokedex",
        &[
            "CREATE TABLE IF NOT EXISTS pokemon (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                name           TEXT    NOT NULL,
                pokedex_number INTEGER NOT NULL,
                classification TEXT    NOT NULL,
                type1          TEXT    NOT NULL,
                type2          TEXT
            )",
            "CREATE INDEX IF NOT EXISTS idx_pokemon_pokedex_number ON pokemon(pokedex_number)",
        ],
    )
    .await
}

/// Credential store: one row per trainer account.
pub async fn create_trainer_tables(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    apply_schema(
        pool,
        "trainers",
        &[
            "CREATE TABLE IF NOT EXISTS trainer (
                id            INTEGER PRIMARY KEY,
                username      TEXT    NOT NULL UNIQUE,
                password_hash TEXT    NOT NULL,
                pokemons      TEXT    NOT NULL DEFAULT ''
            )",
        ],
    )
    .await
}

async fn apply_schema(
    pool: &Pool<Sqlite>,
    store: &str,
    statements: &[&str],
) -> Result<(), StoreError> {
    let current_version: u32 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    if current_version >= SCHEMA_VERSION {
        debug!("{} schema already at version {}", store, current_version);
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for statement in statements {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(
        "{} schema created (version {} -> {})",
        store, current_version, SCHEMA_VERSION
    );
    Ok(())
}
