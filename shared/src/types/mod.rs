pub mod collection;
pub mod json_error;
pub mod jwt;
pub mod login;
pub mod pokemon;
pub mod register;
pub mod server_config;

pub use self::collection::{AddPokemonResponse, Collection, CollectionError};
pub use self::json_error::{ApiError, ErrorResponse};
pub use self::jwt::TokenClaims;
pub use self::login::{LoginData, LoginError, TokenResponse};
pub use self::pokemon::{CatalogError, NewPokemon};
pub use self::register::{RegistrationData, RegistrationError};
pub use self::server_config::{
    AppConfig, AuthConfig, CatalogConfig, CollectionMatch, ConfigError, DuplicateDexPolicy,
    PathsConfig, ServerConfig, SessionMode,
};
