use std::convert::Infallible;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Response, StatusCode, header};
use serde::Serialize;
use tracing::{debug, error, warn};

use shared::types::ErrorResponse;

use crate::handlers::http::utils::deliver_page::full;

/// Serialize any `Serialize` type and deliver it as a JSON response.
/// This is the primary helper all handlers should use instead of
/// writing their own one-off serialization + response-building blocks.
pub fn deliver_serialized_json<T: Serialize>(
    data: &T,
    status: StatusCode,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let json = serde_json::to_string(data).context("Failed to serialize response")?;

    debug!("Delivering serialized JSON response, size: {} bytes", json.len());

    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))?;

    Ok(response)
}

/// Deliver a typed error body (`{"status":"error","code":..,"message":..}`).
pub fn deliver_error_response(
    error: &ErrorResponse,
    status: StatusCode,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    if status.is_server_error() {
        error!("{} - {} ({})", status.as_u16(), error.code, error.message);
    } else {
        warn!("{} - {} ({})", status.as_u16(), error.code, error.message);
    }
    deliver_serialized_json(error, status)
}

/// Build and deliver an error body from a bare code and message.
pub fn deliver_error_json(
    error_code: &str,
    message: &str,
    status: StatusCode,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_error_response(&ErrorResponse::new(error_code, message), status)
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(res: Response<BoxBody<Bytes, Infallible>>) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn error_json_has_status_code_and_message() {
        let res =
            deliver_error_json("NOT_FOUND", "Pokemon not found", StatusCode::NOT_FOUND).unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let json = body_json(res).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Pokemon not found");
    }

    #[tokio::test]
    async fn serialized_json_sets_content_type() {
        let res = deliver_serialized_json(&vec![1, 4, 25], StatusCode::OK).unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_json(res).await, serde_json::json!([1, 4, 25]));
    }
}
