use serde::{Deserialize, Serialize};

/// Claims embedded in every token the server issues.
///
/// The token carries nothing but the username and its validity window; the
/// trainer row is looked up by `sub` whenever a handler needs more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Standard JWT subject, set to the username.
    pub sub: String,

    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: u64,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: u64,
}

impl TokenClaims {
    /// Seconds between issue and expiry.
    pub fn window_secs(&self) -> u64 {
        self.exp.saturating_sub(self.iat)
    }
}
