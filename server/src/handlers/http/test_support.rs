use shared::config::parse_config;
use shared::types::AppConfig;

use crate::AppState;

pub const TEST_CONFIG: &str = r#"
[auth]
jwt_secret = "test-secret-key-for-testing-only"
"#;

pub fn test_config() -> AppConfig {
    parse_config(TEST_CONFIG).unwrap()
}

pub async fn test_state() -> AppState {
    AppState::in_memory(test_config()).await.unwrap()
}

pub async fn test_state_with(config: AppConfig) -> AppState {
    AppState::in_memory(config).await.unwrap()
}
