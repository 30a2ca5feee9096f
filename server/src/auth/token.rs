//! Signed, time-limited bearer tokens (HS256 JWT).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use shared::types::TokenClaims;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens whose subject is a username.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Window used when the caller passes no ttl.
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], default_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Mint a token for `subject` valid for `ttl` (or the default window).
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, now_secs())
    }

    /// Mint a token as if issued at `issued_at` (Unix seconds).
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Option<Duration>,
        issued_at: u64,
    ) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl.as_secs()),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Check signature, then expiry.
    ///
    /// An expired token is reported as `Ok(None)`; anything else wrong with
    /// the token (bad signature, garbage input, missing claims) is an error.
    pub fn verify(&self, token: &str) -> Result<Option<TokenClaims>, TokenError> {
        match jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(Some(data.claims)),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Ok(None),
            Err(e) => Err(TokenError::Invalid(e)),
        }
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
