use serde::Deserialize;

use crate::types::json_error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationData {
    pub username: String,
    pub password: String,
}

/// Error codes for registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    UsernameTaken,
    MissingField(String),
    DatabaseError,
    InternalError,
}

impl ApiError for RegistrationError {
    fn to_code(&self) -> &'static str {
        match self {
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    fn to_message(&self) -> String {
        match self {
            Self::UsernameTaken => "Username already registered".to_string(),
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::DatabaseError => "Database error occurred".to_string(),
            Self::InternalError => "An internal error occurred".to_string(),
        }
    }
}
