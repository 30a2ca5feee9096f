use std::collections::HashMap;

use crate::types::json_error::ApiError;

/// A creature record as submitted to `POST /api/create`, after field
/// extraction. Only presence is checked; the dex number must be an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPokemon {
    pub name: String,
    pub pokedex_number: i64,
    /// Dex number exactly as the client sent it.
    pub raw_pokedex_number: String,
    pub classification: String,
    pub type1: String,
    pub type2: Option<String>,
}

impl NewPokemon {
    pub fn from_form(params: &HashMap<String, String>) -> Result<Self, CatalogError> {
        let field = |name: &str| {
            params
                .get(name)
                .map(|v| v.trim().to_string())
                .ok_or_else(|| CatalogError::MissingField(name.to_string()))
        };

        let raw_pokedex_number = field("pokedex_number")?;
        let pokedex_number = raw_pokedex_number
            .parse::<i64>()
            .map_err(|_| CatalogError::InvalidDexNumber(raw_pokedex_number.clone()))?;

        Ok(Self {
            name: field("name")?,
            pokedex_number,
            raw_pokedex_number,
            classification: field("classification")?,
            type1: field("type1")?,
            type2: params
                .get("type2")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Error codes for the catalog routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound,
    DuplicateDexNumber,
    InvalidDexNumber(String),
    MissingField(String),
    DatabaseError,
}

impl ApiError for CatalogError {
    fn to_code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::DuplicateDexNumber => "DUPLICATE_POKEDEX_NUMBER",
            Self::InvalidDexNumber(_) => "INVALID_POKEDEX_NUMBER",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    fn to_message(&self) -> String {
        match self {
            Self::NotFound => "Pokemon not found".to_string(),
            Self::DuplicateDexNumber => {
                "A Pokemon with this Pokedex number already exists".to_string()
            }
            Self::InvalidDexNumber(raw) => {
                format!("Pokedex number must be an integer, got {:?}", raw)
            }
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::DatabaseError => "Database error occurred".to_string(),
        }
    }
}
