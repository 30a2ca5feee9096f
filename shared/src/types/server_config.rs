use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Root for `/static/...` assets.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,
    /// Catalog store (creature records).
    #[serde(default = "default_pokedex_db")]
    pub pokedex_db: String,
    /// Credential store (trainer accounts). Kept in a separate file from the
    /// catalog.
    #[serde(default = "default_trainers_db")]
    pub trainers_db: String,
}

/// Where authenticated handlers look for "the current token".
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// The process-wide slot written by the last successful login. Every
    /// connection sees the same identity.
    #[default]
    Shared,
    /// The caller's own `Authorization: Bearer` header.
    Bearer,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Lifetime of tokens minted by `/api/login`.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_minutes: u64,
    /// Lifetime used by the issuer when a call site passes no explicit window.
    #[serde(default = "default_fallback_expiry")]
    pub default_token_expiry_minutes: u64,
    /// Subject that the admin-gated routes accept.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default)]
    pub session_mode: SessionMode,
    /// HMAC key used to sign and verify tokens.
    ///
    /// The `JWT_SECRET` environment variable takes priority over this field.
    /// **Hot-reload safe:** NO. Read once at startup; rotating it would
    /// invalidate the token sitting in the session slot.
    pub jwt_secret: Option<String>,
}

/// What `POST /api/create` does when the submitted dex number already exists.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateDexPolicy {
    /// Historical behaviour: the duplicate check never matches, so repeated
    /// dex numbers are stored.
    #[default]
    Allow,
    /// Compare dex numbers as integers and refuse the second record.
    Reject,
}

/// How `POST /api/add_pokemon/:id` decides an identifier is already owned.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMatch {
    /// Historical behaviour: the identifier counts as owned when it appears
    /// anywhere in the stored string, so `1` is refused once `12` is held.
    #[default]
    Substring,
    /// Compare whole identifiers only.
    Exact,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub duplicate_dex_policy: DuplicateDexPolicy,
    #[serde(default)]
    pub collection_match: CollectionMatch,
    /// Rows shown on the `/pokedex` page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"0.0.0.0:80"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl AuthConfig {
    /// Login token window in seconds.
    pub fn token_expiry_secs(&self) -> u64 {
        self.token_expiry_minutes.saturating_mul(60)
    }

    /// Fallback token window in seconds.
    pub fn default_token_expiry_secs(&self) -> u64 {
        self.default_token_expiry_minutes.saturating_mul(60)
    }

    /// Resolve the signing secret with `JWT_SECRET` taking priority over the
    /// config file field.
    ///
    /// Returns `None` when neither source is set.
    pub fn resolved_jwt_secret(&self) -> Option<String> {
        std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.jwt_secret.clone())
            .filter(|s| !s.is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            web_dir: default_web_dir(),
            pokedex_db: default_pokedex_db(),
            trainers_db: default_trainers_db(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            duplicate_dex_policy: DuplicateDexPolicy::default(),
            collection_match: CollectionMatch::default(),
            page_size: default_page_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_bind() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    80
}

pub fn default_max_connections() -> usize {
    1000
}

pub fn default_web_dir() -> String {
    "web".to_string()
}

pub fn default_pokedex_db() -> String {
    "pokedex.sqlite".to_string()
}

pub fn default_trainers_db() -> String {
    "trainers.sqlite".to_string()
}

pub fn default_token_expiry() -> u64 {
    30
}

pub fn default_fallback_expiry() -> u64 {
    15
}

pub fn default_admin_username() -> String {
    "admin".to_string()
}

pub fn default_page_size() -> u32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg: AppConfig = toml::from_str("[auth]\njwt_secret = \"x\"\n").unwrap();
        assert_eq!(cfg.server.addr(), "0.0.0.0:80");
        assert_eq!(cfg.auth.token_expiry_minutes, 30);
        assert_eq!(cfg.auth.default_token_expiry_minutes, 15);
        assert_eq!(cfg.auth.admin_username, "admin");
        assert_eq!(cfg.auth.session_mode, SessionMode::Shared);
        assert_eq!(cfg.catalog.duplicate_dex_policy, DuplicateDexPolicy::Allow);
        assert_eq!(cfg.catalog.collection_match, CollectionMatch::Substring);
        assert_eq!(cfg.catalog.page_size, 50);
        assert_eq!(cfg.paths.trainers_db, "trainers.sqlite");
    }

    #[test]
    fn enums_parse_snake_case() {
        let cfg: AppConfig = toml::from_str(
            "[auth]\nsession_mode = \"bearer\"\n\
             [catalog]\nduplicate_dex_policy = \"reject\"\ncollection_match = \"exact\"\n",
        )
        .unwrap();
        assert_eq!(cfg.auth.session_mode, SessionMode::Bearer);
        assert_eq!(cfg.catalog.duplicate_dex_policy, DuplicateDexPolicy::Reject);
        assert_eq!(cfg.catalog.collection_match, CollectionMatch::Exact);
    }

    #[test]
    fn expiry_helpers_convert_to_seconds() {
        let cfg: AppConfig = toml::from_str("[auth]\n").unwrap();
        assert_eq!(cfg.auth.token_expiry_secs(), 1800);
        assert_eq!(cfg.auth.default_token_expiry_secs(), 900);
    }

    #[test]
    fn huge_expiry_saturates_instead_of_overflowing() {
        let cfg: AppConfig =
            toml::from_str(&format!("[auth]\ntoken_expiry_minutes = {}\n", i64::MAX)).unwrap();
        assert_eq!(cfg.auth.token_expiry_secs(), u64::MAX);
    }
}
