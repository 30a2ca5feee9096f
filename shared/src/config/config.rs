use std::fs;
use tracing::{debug, error, info};

use crate::types::server_config::{AppConfig, ConfigError};

/// Minimum accepted signing-secret length.
pub const MIN_JWT_SECRET_LEN: usize = 16;

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.auth.token_expiry_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_expiry_minutes must be greater than 0".into(),
        ));
    }

    if config.auth.default_token_expiry_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "default_token_expiry_minutes must be greater than 0".into(),
        ));
    }

    if config.auth.admin_username.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "admin_username cannot be empty".into(),
        ));
    }

    if config.server.max_connections == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_connections must be greater than 0".into(),
        ));
    }

    if config.paths.pokedex_db.is_empty() || config.paths.trainers_db.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "pokedex_db and trainers_db must both be set".into(),
        ));
    }

    if config.catalog.page_size == 0 {
        return Err(ConfigError::InvalidConfig(
            "page_size must be greater than 0".into(),
        ));
    }

    match config.auth.resolved_jwt_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be set via the JWT_SECRET env var or auth.jwt_secret config field"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < MIN_JWT_SECRET_LEN => {
            return Err(ConfigError::InvalidConfig(format!(
                "jwt_secret must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            )));
        }
        _ => {}
    }

    Ok(())
}
