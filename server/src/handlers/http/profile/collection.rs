use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use tracing::{error, info, warn};

use shared::types::{AddPokemonResponse, ApiError, CollectionError, TokenClaims};

use crate::AppState;
use crate::handlers::http::utils::{
    deliver_error_response, deliver_serialized_json, path_segment,
};

/// POST /api/add_pokemon/:id
pub async fn handle_add_pokemon(
    req: Request<hyper::body::Incoming>,
    state: AppState,
    claims: TokenClaims,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let raw_id = path_segment(req.uri().path(), 3).unwrap_or_default().to_string();

    let pokemon_id = match raw_id.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            let err = CollectionError::InvalidId(raw_id);
            return deliver_error_response(&err.to_response(), collection_status(&err));
        }
    };

    match add_to_collection(&state, &claims.sub, pokemon_id).await {
        Ok(confirmation) => deliver_serialized_json(&confirmation, StatusCode::OK),
        Err(err) => deliver_error_response(&err.to_response(), collection_status(&err)),
    }
}

pub fn collection_status(error: &CollectionError) -> StatusCode {
    match error {
        CollectionError::UserNotFound | CollectionError::AlreadyExists => StatusCode::NOT_FOUND,
        CollectionError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CollectionError::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Append `pokemon_id` to `username`'s collection. The identifier is not
/// checked against the catalog; `catalog.collection_match` decides what counts
/// as already owned.
pub async fn add_to_collection(
    state: &AppState,
    username: &str,
    pokemon_id: i64,
) -> std::result::Result<AddPokemonResponse, CollectionError> {
    let matching = state.config.read().await.catalog.collection_match;

    let trainer = state
        .trainers
        .get_by_username(username)
        .await
        .map_err(|e| {
            error!("Database error getting trainer: {}", e);
            CollectionError::DatabaseError
        })?
        .ok_or(CollectionError::UserNotFound)?;

    let id = pokemon_id.to_string();
    let mut collection = trainer.collection();
    if collection.owns(&id, matching) {
        warn!("Pokemon {} already owned by {}", pokemon_id, username);
        return Err(CollectionError::AlreadyExists);
    }
    collection.insert(&id);

    state
        .trainers
        .set_collection(trainer.id, &collection)
        .await
        .map_err(|e| {
            error!("Database error saving collection: {}", e);
            CollectionError::DatabaseError
        })?;

    info!("Pokemon {} added to {}'s collection", pokemon_id, username);

    Ok(AddPokemonResponse::added(pokemon_id, username))
}
