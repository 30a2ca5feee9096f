use std::convert::Infallible;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::info;

use shared::types::TokenClaims;

use crate::AppState;
use crate::handlers::http::pages;
use crate::handlers::http::utils::{deliver_error_json, deliver_html};

/// GET /api/profile: the current trainer's profile page.
///
/// `claims` come from the router's trainer tier.
pub async fn handle_get_profile(
    _req: Request<hyper::body::Incoming>,
    state: AppState,
    claims: TokenClaims,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing get profile for trainer {}", claims.sub);

    let trainer = match state
        .trainers
        .get_by_username(&claims.sub)
        .await
        .context("Failed to look up trainer")?
    {
        Some(trainer) => trainer,
        None => {
            return deliver_error_json("USER_NOT_FOUND", "User not found", StatusCode::NOT_FOUND);
        }
    };

    let pokemon_names = state
        .pokedex
        .list_names()
        .await
        .context("Failed to list pokemon names")?;

    deliver_html(pages::profile_page(&trainer, &pokemon_names), StatusCode::OK)
}
