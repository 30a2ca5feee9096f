use serde::{Deserialize, Serialize};

use crate::types::json_error::ApiError;

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

/// Body returned by a successful login, and the value held in the session
/// slot afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Login errors
// ---------------------------------------------------------------------------

/// Unknown usernames and wrong passwords are reported separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    UsernameNotFound,
    IncorrectPassword,
    MissingField(String),
    DatabaseError,
    InternalError,
}

impl ApiError for LoginError {
    fn to_code(&self) -> &'static str {
        match self {
            Self::UsernameNotFound => "USERNAME_NOT_FOUND",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    fn to_message(&self) -> String {
        match self {
            Self::UsernameNotFound => "Username not found".to_string(),
            Self::IncorrectPassword => "Incorrect password".to_string(),
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::DatabaseError => "Database error occurred".to_string(),
            Self::InternalError => "An internal error occurred".to_string(),
        }
    }
}
