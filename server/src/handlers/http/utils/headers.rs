use hyper::header::{HeaderMap, HeaderValue};
use tracing::debug;

/// Extract a header value as a string
pub fn get_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(|s| {
        debug!("Retrieved header: {}", name);
        s.to_string()
    })
}

/// Extract bearer token from Authorization header
/// Format: "Authorization: Bearer <token>"
pub fn get_bearer_token(headers: &HeaderMap) -> Option<String> {
    get_header_value(headers, "authorization").and_then(|auth| {
        let token = auth.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            None
        } else {
            debug!("Bearer token extracted");
            Some(token.to_string())
        }
    })
}

/// Path segment `index` of `path`, counting the empty segment before the
/// leading slash as 0. `/api/add_pokemon/7` has `7` at index 3.
pub fn path_segment(path: &str, index: usize) -> Option<&str> {
    path.split('?')
        .next()
        .and_then(|p| p.split('/').nth(index))
        .filter(|s| !s.is_empty())
}

/// Add no-cache headers for rendered pages
pub fn add_no_cache_headers<T>(mut res: hyper::Response<T>) -> hyper::Response<T> {
    let headers = res.headers_mut();

    headers.insert(
        "cache-control",
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert("pragma", HeaderValue::from_static("no-cache"));
    headers.insert("expires", HeaderValue::from_static("0"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );

    res
}

/// Add public cache headers with the given max-age
pub fn add_cache_headers_with_max_age<T>(
    mut res: hyper::Response<T>,
    max_age_seconds: u64,
) -> hyper::Response<T> {
    let headers = res.headers_mut();

    let cache_control = format!("public, max-age={}", max_age_seconds);
    headers.insert(
        "cache-control",
        HeaderValue::from_str(&cache_control)
            .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=3600")),
    );
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );

    debug!("Added cache headers with max-age: {} seconds", max_age_seconds);
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(get_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        assert!(get_bearer_token(&headers_with_auth("Basic dXNlcjpwYXNz")).is_none());
        assert!(get_bearer_token(&headers_with_auth("Bearer ")).is_none());
        assert!(get_bearer_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn path_segments_are_indexed_from_the_root() {
        assert_eq!(path_segment("/api/add_pokemon/7", 3), Some("7"));
        assert_eq!(path_segment("/pokedex/25?x=1", 2), Some("25"));
        assert_eq!(path_segment("/pokedex/", 2), None);
        assert_eq!(path_segment("/pokedex", 2), None);
    }
}
