/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `collection.rs`, `pokemon.rs` and `server_config.rs`).
// ---------------------------------------------------------------------------
// Token claims
// ---------------------------------------------------------------------------
#[cfg(test)]
mod jwt_tests {
    use shared::types::*;

    fn sample_claims() -> TokenClaims {
        TokenClaims {
            sub: "ash".to_string(),
            exp: 1_700_001_800,
            iat: 1_700_000_000,
        }
    }

    #[test]
    fn claims_json_contains_expected_keys() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        for key in &["sub", "exp", "iat"] {
            assert!(json.get(key).is_some(), "missing key: {}", key);
        }
    }

    #[test]
    fn window_is_exp_minus_iat() {
        assert_eq!(sample_claims().window_secs(), 1800);
    }

    #[test]
    fn window_never_underflows() {
        let mut c = sample_claims();
        c.exp = 0;
        assert_eq!(c.window_secs(), 0);
    }
}

// ---------------------------------------------------------------------------
// Login types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod login_tests {
    use shared::types::*;

    #[test]
    fn login_data_deserializes() {
        let json = r#"{"username":"misty","password":"starmie"}"#;
        let d: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(d.username, "misty");
        assert_eq!(d.password, "starmie");
    }

    #[test]
    fn token_response_is_bearer() {
        let r = TokenResponse::bearer("a.b.c".into());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["access_token"], "a.b.c");
        assert_eq!(json["token_type"], "bearer");
    }

    #[test]
    fn unknown_user_and_wrong_password_are_distinct() {
        assert_ne!(
            LoginError::UsernameNotFound.to_code(),
            LoginError::IncorrectPassword.to_code()
        );
        assert_eq!(LoginError::UsernameNotFound.to_message(), "Username not found");
        assert_eq!(LoginError::IncorrectPassword.to_message(), "Incorrect password");
    }

    #[test]
    fn all_error_variants_have_non_empty_messages() {
        let variants = vec![
            LoginError::UsernameNotFound,
            LoginError::IncorrectPassword,
            LoginError::MissingField("password".into()),
            LoginError::DatabaseError,
            LoginError::InternalError,
        ];
        for e in variants {
            assert!(!e.to_code().is_empty());
            assert!(!e.to_message().is_empty());
        }
    }

    #[test]
    fn login_error_response_is_serializable() {
        let json = serde_json::to_value(LoginError::IncorrectPassword.to_response()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "INCORRECT_PASSWORD");
    }
}

// ---------------------------------------------------------------------------
// Registration types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod register_tests {
    use shared::types::*;

    #[test]
    fn username_taken_message_matches_api() {
        assert_eq!(
            RegistrationError::UsernameTaken.to_message(),
            "Username already registered"
        );
    }

    #[test]
    fn missing_field_names_the_field() {
        let e = RegistrationError::MissingField("username".into());
        assert_eq!(e.to_code(), "MISSING_FIELD");
        assert!(e.to_message().contains("username"));
    }
}

// ---------------------------------------------------------------------------
// Collection types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod collection_tests {
    use shared::types::*;

    #[test]
    fn confirmation_names_id_and_trainer() {
        let r = AddPokemonResponse::added(25, "ash");
        assert_eq!(r.message, "Pokemon with ID 25 added to trainer ash's pokemons");
    }

    #[test]
    fn stored_form_round_trips_through_insert() {
        let mut c = Collection::parse("1,4");
        c.insert("7");
        assert_eq!(Collection::parse(&c.to_stored()), c);
    }

    #[test]
    fn already_exists_uses_legacy_message() {
        assert_eq!(
            CollectionError::AlreadyExists.to_message(),
            "Pokemon already exists"
        );
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use shared::config::{LiveConfig, load_config, parse_config};
    use shared::types::*;

    const VALID: &str = r#"
[server]
bind = "127.0.0.1"
port = 8080

[paths]
web_dir = "web"
pokedex_db = "pokedex.sqlite"
trainers_db = "trainers.sqlite"

[auth]
jwt_secret = "0123456789abcdef0123456789abcdef"
"#;

    #[test]
    fn loads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(VALID.as_bytes()).unwrap();
        let cfg = load_config(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn empty_file_is_rejected() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let err = load_config(f.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn zero_login_window_is_rejected() {
        let text = format!("{}token_expiry_minutes = 0\n", VALID);
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn blank_admin_username_is_rejected() {
        let text = format!("{}admin_username = \"  \"\n", VALID);
        assert!(parse_config(&text).is_err());
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(
            parse_config("[server\nport = 1"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[tokio::test]
    async fn reload_is_visible_to_clones() {
        let live = LiveConfig::new(parse_config(VALID).unwrap());
        let clone = live.clone();

        let mut next = parse_config(VALID).unwrap();
        next.auth.admin_username = "oak".into();
        live.reload(next).await;

        assert_eq!(clone.read().await.auth.admin_username, "oak");
    }
}
