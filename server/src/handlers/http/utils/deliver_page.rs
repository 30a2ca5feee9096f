use std::convert::Infallible;
use std::fmt;
use std::path::Path;

use anyhow::{Result, anyhow};
use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full, combinators::BoxBody};
use hyper::{Response, StatusCode, header};
use tracing::{debug, error};

use crate::handlers::http::utils::headers;

#[derive(Debug, Clone, Copy)]
pub enum CacheStrategy {
    Yes,      // 1 day
    Explicit, // No cache at all
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStrategy::Yes => write!(f, "Yes (1 day)"),
            CacheStrategy::Explicit => write!(f, "Explicit (no-cache)"),
        }
    }
}

/// Deliver a rendered HTML document with no-cache headers.
pub fn deliver_html(
    document: String,
    status: StatusCode,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    debug!(
        "Delivering HTML page with status: {}, size: {} bytes",
        status,
        document.len()
    );

    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(full(document))
        .map_err(|e: http::Error| {
            error!("Failed to build HTML response: {}", e);
            anyhow!("Failed to build HTML response: {}", e)
        })?;

    Ok(headers::add_no_cache_headers(response))
}

/// Deliver file contents already read from disk, typed by extension.
pub fn deliver_page_with_status(
    file_path: &Path,
    content: Vec<u8>,
    status: StatusCode,
    cache: CacheStrategy,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let content_bytes = Bytes::from(content);
    let mime_type = get_mime_type(file_path);

    debug!(
        "Delivering static file {} with status: {}, size: {} bytes, mime: {}, cache: {}",
        file_path.display(),
        status,
        content_bytes.len(),
        mime_type,
        cache
    );

    let response: Response<BoxBody<Bytes, Infallible>> = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, mime_type)
        .body(full(content_bytes))
        .map_err(|e| anyhow!("Failed to build response: {}", e))?;

    Ok(match cache {
        CacheStrategy::Yes => headers::add_cache_headers_with_max_age(response, 86_400),
        CacheStrategy::Explicit => headers::add_no_cache_headers(response),
    })
}

/// MIME type from file extension
pub fn get_mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",

        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

/// Helper function to create an empty body
pub fn empty() -> BoxBody<Bytes, Infallible> {
    Empty::<Bytes>::new().boxed()
}

/// Helper function to create a full body from various types
pub fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, Infallible> {
    Full::new(chunk.into()).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_follow_extension() {
        assert_eq!(get_mime_type(Path::new("a/style.css")), "text/css; charset=utf-8");
        assert_eq!(get_mime_type(Path::new("pikachu.png")), "image/png");
        assert_eq!(
            get_mime_type(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn html_pages_are_not_cached() {
        let res = deliver_html("<p>hi</p>".into(), StatusCode::OK).unwrap();
        assert_eq!(
            res.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            res.headers().get("cache-control").unwrap(),
            "no-cache, no-store, must-revalidate"
        );
    }
}
