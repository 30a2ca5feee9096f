use std::collections::HashMap;
use std::convert::Infallible;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::{error, info, warn};

use shared::types::{ApiError, RegistrationData, RegistrationError};

use crate::AppState;
use crate::auth::hash_password;
use crate::database::{StoreError, Trainer};
use crate::handlers::http::pages;
use crate::handlers::http::utils::{
    deliver_error_response, deliver_html, deliver_serialized_json, read_form, required_field,
};

/// GET /api/trainers
pub async fn handle_trainers_page(
    _req: Request<hyper::body::Incoming>,
    _state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_html(pages::trainers_page(), StatusCode::OK)
}

/// POST /api/register
///
/// Responds with the stored trainer row, password hash included.
pub async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing registration request");

    let fields = read_form(req)
        .await
        .context("Failed to read registration form")?;

    let registration = match parse_registration_form(&fields) {
        Ok(data) => data,
        Err(reg_error) => {
            warn!("Registration parsing failed: {}", reg_error.to_code());
            return deliver_error_response(&reg_error.to_response(), registration_status(&reg_error));
        }
    };

    match attempt_registration(&registration, &state).await {
        Ok(trainer) => deliver_serialized_json(&trainer, StatusCode::OK),
        Err(reg_error) => {
            deliver_error_response(&reg_error.to_response(), registration_status(&reg_error))
        }
    }
}

pub fn registration_status(error: &RegistrationError) -> StatusCode {
    match error {
        RegistrationError::UsernameTaken => StatusCode::BAD_REQUEST,
        RegistrationError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistrationError::DatabaseError | RegistrationError::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn parse_registration_form(
    fields: &HashMap<String, String>,
) -> std::result::Result<RegistrationData, RegistrationError> {
    let username = required_field(fields, "username")
        .ok_or_else(|| RegistrationError::MissingField("username".to_string()))?
        .to_string();

    let password = fields
        .get("password")
        .ok_or_else(|| RegistrationError::MissingField("password".to_string()))?
        .to_string();

    Ok(RegistrationData { username, password })
}

/// Create a trainer with an empty collection.
pub async fn attempt_registration(
    data: &RegistrationData,
    state: &AppState,
) -> std::result::Result<Trainer, RegistrationError> {
    info!("Attempting registration for user: {}", data.username);

    let taken = state
        .trainers
        .username_exists(&data.username)
        .await
        .map_err(|e| {
            error!("Database error checking username: {}", e);
            RegistrationError::DatabaseError
        })?;

    if taken {
        warn!("Username already registered: {}", data.username);
        return Err(RegistrationError::UsernameTaken);
    }

    let password = data.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!("Password hashing task failed: {}", e);
            RegistrationError::InternalError
        })?
        .map_err(|e| {
            error!("Password hashing error: {}", e);
            RegistrationError::InternalError
        })?;

    let trainer = state
        .trainers
        .register(&data.username, &password_hash)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same name.
            StoreError::UniqueViolation(_) => {
                warn!("Username already registered: {}", data.username);
                RegistrationError::UsernameTaken
            }
            other => {
                error!("Database error registering trainer: {}", other);
                RegistrationError::DatabaseError
            }
        })?;

    info!(
        "Trainer registered successfully: {} (ID: {})",
        trainer.username, trainer.id
    );

    Ok(trainer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::handlers::http::test_support::test_state;

    fn data(username: &str, password: &str) -> RegistrationData {
        RegistrationData {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn registration_returns_stored_row_with_hash() {
        let state = test_state().await;
        let trainer = attempt_registration(&data("ash", "pikachu"), &state)
            .await
            .unwrap();

        assert_eq!(trainer.id, 1);
        assert_eq!(trainer.pokemons, "");
        assert!(verify_password(&trainer.password_hash, "pikachu"));

        let json = serde_json::to_value(&trainer).unwrap();
        assert!(json.get("password_hash").is_some());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_and_first_survives() {
        let state = test_state().await;
        let first = attempt_registration(&data("ash", "pikachu"), &state)
            .await
            .unwrap();

        let err = attempt_registration(&data("ash", "other"), &state)
            .await
            .unwrap_err();
        assert_eq!(err, RegistrationError::UsernameTaken);
        assert_eq!(registration_status(&err), StatusCode::BAD_REQUEST);

        let stored = state.trainers.get_by_username("ash").await.unwrap();
        assert_eq!(stored, Some(first));
    }

    #[tokio::test]
    async fn ids_follow_max_plus_one() {
        let state = test_state().await;
        let a = attempt_registration(&data("a", "x"), &state).await.unwrap();
        let b = attempt_registration(&data("b", "x"), &state).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn username_is_stored_as_submitted() {
        let state = test_state().await;
        let fields: HashMap<String, String> = [
            ("username".to_string(), " ash".to_string()),
            ("password".to_string(), "pikachu".to_string()),
        ]
        .into();

        let form = parse_registration_form(&fields).unwrap();
        let trainer = attempt_registration(&form, &state).await.unwrap();
        assert_eq!(trainer.username, " ash");
        assert!(state.trainers.get_by_username("ash").await.unwrap().is_none());
    }

    #[test]
    fn missing_username_is_unprocessable() {
        let fields: HashMap<String, String> =
            [("password".to_string(), "x".to_string())].into();
        let err = parse_registration_form(&fields).unwrap_err();
        assert_eq!(registration_status(&err), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
