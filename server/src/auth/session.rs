//! The process-wide session slot and caller resolution.
//!
//! A successful login overwrites the slot; in [`SessionMode::Shared`] every
//! authenticated request reads its identity from there, whichever connection
//! it arrived on. [`SessionMode::Bearer`] reads the request's own
//! `Authorization` header instead.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use shared::types::{SessionMode, TokenClaims, TokenResponse};

use super::token::{TokenError, TokenIssuer};

/// Holds the single most recently issued token. Empty at start.
#[derive(Clone, Debug, Default)]
pub struct SessionSlot(Arc<RwLock<Option<TokenResponse>>>);

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TokenResponse> {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn current_token(&self) -> Option<String> {
        self.current().map(|t| t.access_token)
    }

    /// Overwrite the slot wholesale.
    pub fn replace(&self, token: TokenResponse) {
        let mut guard = match self.0.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(token);
    }
}

/// Who the server thinks is making the current request.
#[derive(Debug)]
pub enum Caller {
    /// No token to look at.
    Anonymous,
    /// A correctly signed token past its expiry.
    Expired,
    /// A token that failed to decode or verify.
    Invalid(TokenError),
    Trainer(TokenClaims),
}

impl Caller {
    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            Caller::Trainer(claims) => Some(claims),
            _ => None,
        }
    }

    /// True only for a live token whose subject is `admin_username`.
    pub fn is_admin(&self, admin_username: &str) -> bool {
        self.claims()
            .map(|claims| claims.sub == admin_username)
            .unwrap_or(false)
    }
}

/// Pick "the current token" according to `mode`.
///
/// `request_token` is the bearer token presented on this request, if any;
/// it is ignored in shared mode.
pub fn current_token(
    slot: &SessionSlot,
    mode: SessionMode,
    request_token: Option<String>,
) -> Option<String> {
    match mode {
        SessionMode::Shared => slot.current_token(),
        SessionMode::Bearer => request_token,
    }
}

/// Verify `token` and classify the result.
pub fn resolve_caller(issuer: &TokenIssuer, token: Option<String>) -> Caller {
    let Some(token) = token else {
        return Caller::Anonymous;
    };

    match issuer.verify(&token) {
        Ok(Some(claims)) => {
            debug!("Current caller is {}", claims.sub);
            Caller::Trainer(claims)
        }
        Ok(None) => {
            debug!("Current token has expired");
            Caller::Expired
        }
        Err(e) => {
            warn!("Current token rejected: {}", e);
            Caller::Invalid(e)
        }
    }
}
