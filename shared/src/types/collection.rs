use serde::{Deserialize, Serialize};

use crate::types::json_error::ApiError;
use crate::types::server_config::CollectionMatch;

/// A trainer's owned creature identifiers.
///
/// Persisted as a comma-joined string (`"1,4,25"`). Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    ids: Vec<String>,
}

impl Collection {
    /// Parse the stored form. Empty segments are dropped.
    pub fn parse(stored: &str) -> Self {
        let mut collection = Self::default();
        for id in stored.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            collection.insert(id);
        }
        collection
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Whether `id` already counts as owned under `matching`.
    pub fn owns(&self, id: &str, matching: CollectionMatch) -> bool {
        match matching {
            CollectionMatch::Substring => self.to_stored().contains(id),
            CollectionMatch::Exact => self.contains(id),
        }
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// The comma-joined form written back to the trainer row.
    pub fn to_stored(&self) -> String {
        self.ids.join(",")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPokemonResponse {
    pub message: String,
}

impl AddPokemonResponse {
    pub fn added(pokemon_id: i64, username: &str) -> Self {
        Self {
            message: format!(
                "Pokemon with ID {} added to trainer {}'s pokemons",
                pokemon_id, username
            ),
        }
    }
}

/// Error codes for `POST /api/add_pokemon/:id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    UserNotFound,
    AlreadyExists,
    InvalidId(String),
    DatabaseError,
}

impl ApiError for CollectionError {
    fn to_code(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AlreadyExists => "POKEMON_ALREADY_EXISTS",
            Self::InvalidId(_) => "INVALID_POKEMON_ID",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    fn to_message(&self) -> String {
        match self {
            Self::UserNotFound => "User not found".to_string(),
            Self::AlreadyExists => "Pokemon already exists".to_string(),
            Self::InvalidId(raw) => format!("Pokemon id must be an integer, got {:?}", raw),
            Self::DatabaseError => "Database error occurred".to_string(),
        }
    }
}
