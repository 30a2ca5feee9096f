use std::collections::HashMap;
use std::convert::Infallible;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::{error, info, warn};

use shared::types::{ApiError, LoginData, LoginError, TokenResponse};

use crate::AppState;
use crate::auth::verify_password;
use crate::handlers::http::utils::{
    deliver_error_response, deliver_serialized_json, read_form, required_field,
};

/// POST /api/login
pub async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing login request");

    let fields = read_form(req).await.context("Failed to read login form")?;

    let login_data = match parse_login_form(&fields) {
        Ok(data) => data,
        Err(login_error) => {
            warn!("Login parsing failed: {}", login_error.to_code());
            return deliver_error_response(&login_error.to_response(), login_status(&login_error));
        }
    };

    match attempt_login(&login_data, &state).await {
        Ok(token) => deliver_serialized_json(&token, StatusCode::OK),
        Err(login_error) => {
            warn!(
                "Login failed for {}: {}",
                login_data.username,
                login_error.to_code()
            );
            deliver_error_response(&login_error.to_response(), login_status(&login_error))
        }
    }
}

pub fn login_status(error: &LoginError) -> StatusCode {
    match error {
        LoginError::UsernameNotFound | LoginError::IncorrectPassword => StatusCode::UNAUTHORIZED,
        LoginError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LoginError::DatabaseError | LoginError::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Only presence is checked; an empty username is simply not found.
fn parse_login_form(
    fields: &HashMap<String, String>,
) -> std::result::Result<LoginData, LoginError> {
    let username = required_field(fields, "username")
        .ok_or_else(|| LoginError::MissingField("username".to_string()))?
        .to_string();

    let password = fields
        .get("password")
        .ok_or_else(|| LoginError::MissingField("password".to_string()))?
        .to_string();

    Ok(LoginData { username, password })
}

/// Check credentials, mint a token for the login window and store it in the
/// session slot. A failed attempt leaves the slot as it was.
pub async fn attempt_login(
    data: &LoginData,
    state: &AppState,
) -> std::result::Result<TokenResponse, LoginError> {
    info!("Attempting login for user: {}", data.username);

    let trainer = state
        .trainers
        .get_by_username(&data.username)
        .await
        .map_err(|e| {
            error!("Database error getting trainer: {}", e);
            LoginError::DatabaseError
        })?
        .ok_or(LoginError::UsernameNotFound)?;

    let hash = trainer.password_hash.clone();
    let password = data.password.clone();
    let password_valid = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .map_err(|e| {
            error!("Password verification task failed: {}", e);
            LoginError::InternalError
        })?;

    if !password_valid {
        return Err(LoginError::IncorrectPassword);
    }

    let window = Duration::from_secs(state.config.read().await.auth.token_expiry_secs());
    let access_token = state
        .tokens
        .issue(&trainer.username, Some(window))
        .map_err(|e| {
            error!("Token signing failed: {}", e);
            LoginError::InternalError
        })?;

    let token = TokenResponse::bearer(access_token);
    state.session.replace(token.clone());

    info!(
        "Trainer logged in successfully: {} (ID: {})",
        trainer.username, trainer.id
    );

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::now_secs;
    use crate::handlers::http::auth::register::attempt_registration;
    use crate::handlers::http::test_support::test_state;
    use shared::types::RegistrationData;

    fn creds(username: &str, password: &str) -> LoginData {
        LoginData {
            username: username.into(),
            password: password.into(),
        }
    }

    async fn register(state: &AppState, username: &str, password: &str) {
        attempt_registration(
            &RegistrationData {
                username: username.into(),
                password: password.into(),
            },
            state,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn successful_login_fills_the_slot() {
        let state = test_state().await;
        register(&state, "ash", "pikachu").await;

        let token = attempt_login(&creds("ash", "pikachu"), &state).await.unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(state.session.current(), Some(token.clone()));

        let claims = state.tokens.verify(&token.access_token).unwrap().unwrap();
        assert_eq!(claims.sub, "ash");
        assert_eq!(claims.window_secs(), 30 * 60);
        assert!(claims.exp >= now_secs() + 29 * 60);
    }

    #[tokio::test]
    async fn failures_are_distinct_and_leave_slot_alone() {
        let state = test_state().await;
        register(&state, "ash", "pikachu").await;

        assert_eq!(
            attempt_login(&creds("gary", "eevee"), &state).await,
            Err(LoginError::UsernameNotFound)
        );
        assert_eq!(
            attempt_login(&creds("ash", "wrong"), &state).await,
            Err(LoginError::IncorrectPassword)
        );
        assert!(state.session.current().is_none());

        let first = attempt_login(&creds("ash", "pikachu"), &state).await.unwrap();
        let _ = attempt_login(&creds("ash", "wrong"), &state).await;
        assert_eq!(state.session.current(), Some(first));
    }

    #[tokio::test]
    async fn later_login_overwrites_earlier() {
        let state = test_state().await;
        register(&state, "ash", "pikachu").await;
        register(&state, "misty", "starmie").await;

        attempt_login(&creds("ash", "pikachu"), &state).await.unwrap();
        let second = attempt_login(&creds("misty", "starmie"), &state).await.unwrap();
        assert_eq!(state.session.current(), Some(second));
    }

    #[test]
    fn missing_password_is_unprocessable() {
        let fields: HashMap<String, String> =
            [("username".to_string(), "ash".to_string())].into();
        let err = parse_login_form(&fields).unwrap_err();
        assert_eq!(err, LoginError::MissingField("password".into()));
        assert_eq!(login_status(&err), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
