//! Public HTML views of the catalog.

use std::convert::Infallible;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::debug;

use shared::types::ApiError;

use crate::AppState;
use crate::handlers::http::catalog::api::{catalog_status, dex_from_path};
use crate::handlers::http::pages;
use crate::handlers::http::utils::{deliver_error_response, deliver_html};

/// GET /
pub async fn handle_home(
    _req: Request<hyper::body::Incoming>,
    _state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_html(pages::home_page(), StatusCode::OK)
}

/// GET /pokedex: first `catalog.page_size` records.
pub async fn handle_pokedex_list(
    _req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let page_size = state.config.read().await.catalog.page_size;
    let pokemons = state
        .pokedex
        .list(Some(page_size))
        .await
        .context("Failed to list pokemons")?;

    deliver_html(pages::pokemon_list_page(&pokemons), StatusCode::OK)
}

/// GET /pokedex/:dex. A missing record renders the not-found page with 200.
pub async fn handle_pokedex_detail(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let dex = match dex_from_path(req.uri().path(), 2) {
        Ok(dex) => dex,
        Err(e) => return deliver_error_response(&e.to_response(), catalog_status(&e)),
    };

    match state
        .pokedex
        .get_by_dex(dex)
        .await
        .context("Failed to fetch pokemon")?
    {
        Some(pokemon) => deliver_html(pages::pokemon_detail_page(&pokemon), StatusCode::OK),
        None => {
            debug!("No pokemon with dex number {}", dex);
            deliver_html(pages::pokemon_not_found_page(), StatusCode::OK)
        }
    }
}
