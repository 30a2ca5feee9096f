//! Admin-only catalog endpoints. The router has already confirmed the caller
//! is the admin before any of these run.

use std::convert::Infallible;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::{error, info, warn};

use shared::types::{ApiError, CatalogError, NewPokemon};

use crate::AppState;
use crate::database::Pokemon;
use crate::handlers::http::pages;
use crate::handlers::http::utils::{
    deliver_error_response, deliver_html, deliver_serialized_json, path_segment, read_form,
};

pub fn catalog_status(error: &CatalogError) -> StatusCode {
    match error {
        CatalogError::NotFound => StatusCode::NOT_FOUND,
        CatalogError::DuplicateDexNumber => StatusCode::BAD_REQUEST,
        CatalogError::InvalidDexNumber(_) | CatalogError::MissingField(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CatalogError::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn deliver_catalog_error(error: CatalogError) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_error_response(&error.to_response(), catalog_status(&error))
}

/// Parse the dex number at path segment `index`.
pub fn dex_from_path(path: &str, index: usize) -> std::result::Result<i64, CatalogError> {
    let raw = path_segment(path, index).unwrap_or_default();
    raw.parse::<i64>()
        .map_err(|_| CatalogError::InvalidDexNumber(raw.to_string()))
}

/// GET /api/pokemons
pub async fn handle_list_pokemons(
    _req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let pokemons = state
        .pokedex
        .list(None)
        .await
        .context("Failed to list pokemons")?;

    info!("Listing {} pokemon(s)", pokemons.len());
    deliver_serialized_json(&pokemons, StatusCode::OK)
}

/// GET /api/pokemons/:dex
pub async fn handle_get_pokemon(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let dex = match dex_from_path(req.uri().path(), 3) {
        Ok(dex) => dex,
        Err(e) => return deliver_catalog_error(e),
    };

    match state
        .pokedex
        .get_by_dex(dex)
        .await
        .context("Failed to fetch pokemon")?
    {
        Some(pokemon) => deliver_serialized_json(&pokemon, StatusCode::OK),
        None => deliver_catalog_error(CatalogError::NotFound),
    }
}

/// GET /api/create
pub async fn handle_create_page(
    _req: Request<hyper::body::Incoming>,
    _state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_html(pages::create_pokemon_page(), StatusCode::OK)
}

/// POST /api/create
pub async fn handle_create_pokemon(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let fields = read_form(req).await.context("Failed to read create form")?;

    let new = match NewPokemon::from_form(&fields) {
        Ok(new) => new,
        Err(e) => {
            warn!("Create form rejected: {}", e.to_code());
            return deliver_catalog_error(e);
        }
    };

    match create_pokemon(&state, &new).await {
        Ok(pokemon) => deliver_serialized_json(&pokemon, StatusCode::OK),
        Err(e) => deliver_catalog_error(e),
    }
}

/// Store `new` unless the configured duplicate policy refuses it.
pub async fn create_pokemon(
    state: &AppState,
    new: &NewPokemon,
) -> std::result::Result<Pokemon, CatalogError> {
    let policy = state.config.read().await.catalog.duplicate_dex_policy;

    let existing = state
        .pokedex
        .find_duplicate(new, policy)
        .await
        .map_err(|e| {
            error!("Database error checking duplicate: {}", e);
            CatalogError::DatabaseError
        })?;

    if let Some(existing) = existing {
        warn!(
            "Pokedex number {} already taken by {}",
            new.pokedex_number, existing.name
        );
        return Err(CatalogError::DuplicateDexNumber);
    }

    state.pokedex.insert(new).await.map_err(|e| {
        error!("Database error inserting pokemon: {}", e);
        CatalogError::DatabaseError
    })
}
