use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_cafefinder_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("CAFEFINDER_PORT");
        env::remove_var("CAFEFINDER_BIND_ADDR");
        env::remove_var("CAFEFINDER_DATABASE_PATH");
        env::remove_var("CAFEFINDER_QDRANT_URL");
        env::remove_var("CAFEFINDER_EMBEDDING_URL");
        env::remove_var("CAFEFINDER_EMBEDDING_API_KEY");
        env::remove_var("CAFEFINDER_EMBEDDING_MODEL");
        env::remove_var("CAFEFINDER_LEXICAL_WEIGHT");
        env::remove_var("CAFEFINDER_VECTOR_WEIGHT");
        env::remove_var("CAFEFINDER_SESSION_TTL_SECS");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.database_path, PathBuf::from("./cafefinder.db"));
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.embedding_url, "https://api.openai.com");
    assert!(config.embedding_api_key.is_none());
    assert_eq!(config.embedding_model, "text-embedding-3-small");
    assert_eq!(config.lexical_weight, 0.05);
    assert_eq!(config.vector_weight, 0.95);
    assert_eq!(config.session_ttl_secs, 3600);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_cafefinder_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_cafefinder_env();

    with_env_vars(&[("CAFEFINDER_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_cafefinder_env();

    with_env_vars(&[("CAFEFINDER_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_cafefinder_env();

    with_env_vars(&[("CAFEFINDER_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_cafefinder_env();

    with_env_vars(&[("CAFEFINDER_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_custom_weights() {
    clear_cafefinder_env();

    with_env_vars(
        &[
            ("CAFEFINDER_LEXICAL_WEIGHT", "0.3"),
            ("CAFEFINDER_VECTOR_WEIGHT", "0.7"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.lexical_weight, 0.3);
            assert_eq!(config.vector_weight, 0.7);
            config.validate().expect("weights sum to 1");
        },
    );
}

#[test]
#[serial]
fn test_unparseable_weight_is_an_error() {
    clear_cafefinder_env();

    with_env_vars(&[("CAFEFINDER_LEXICAL_WEIGHT", "heavy")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::WeightParseError { .. }));
        assert!(err.to_string().contains("CAFEFINDER_LEXICAL_WEIGHT"));
    });
}

#[test]
fn test_validate_rejects_weights_not_summing_to_one() {
    let config = Config {
        lexical_weight: 0.5,
        vector_weight: 0.7,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidWeights { .. }));
}

#[test]
fn test_validate_rejects_negative_weight() {
    let config = Config {
        lexical_weight: -0.05,
        vector_weight: 1.05,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWeights { .. })
    ));
}

#[test]
fn test_validate_rejects_non_positive_ttl() {
    let config = Config {
        session_ttl_secs: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidSessionTtl { .. })
    ));
}

#[test]
fn test_validate_rejects_directory_database_path() {
    let config = Config {
        database_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src"),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotAFile { .. })
    ));
}

#[test]
fn test_validate_success_with_defaults() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_invalid_ttl_falls_back_to_default() {
    clear_cafefinder_env();

    with_env_vars(&[("CAFEFINDER_SESSION_TTL_SECS", "not_a_number")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.session_ttl_secs, 3600);
    });
}

#[test]
#[serial]
fn test_blank_api_key_is_treated_as_absent() {
    clear_cafefinder_env();

    with_env_vars(&[("CAFEFINDER_EMBEDDING_API_KEY", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.embedding_api_key.is_none());
    });
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_cafefinder_env();

    with_env_vars(
        &[
            ("CAFEFINDER_PORT", "8080"),
            ("CAFEFINDER_BIND_ADDR", "0.0.0.0"),
            ("CAFEFINDER_DATABASE_PATH", "/var/lib/cafefinder/cafes.db"),
            ("CAFEFINDER_QDRANT_URL", "http://qdrant.cluster:6334"),
            ("CAFEFINDER_EMBEDDING_URL", "http://ollama.local:11434"),
            ("CAFEFINDER_EMBEDDING_API_KEY", "sk-test"),
            ("CAFEFINDER_EMBEDDING_MODEL", "nomic-embed-text"),
            ("CAFEFINDER_SESSION_TTL_SECS", "1800"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.port, 8080);
            assert_eq!(
                config.bind_addr,
                IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
            );
            assert_eq!(
                config.database_path,
                PathBuf::from("/var/lib/cafefinder/cafes.db")
            );
            assert_eq!(config.qdrant_url, "http://qdrant.cluster:6334");
            assert_eq!(config.embedding_url, "http://ollama.local:11434");
            assert_eq!(config.embedding_api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.embedding_model, "nomic-embed-text");
            assert_eq!(config.session_ttl_secs, 1800);
            assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        },
    );
}

#[test]
fn test_fusion_weights_accessor() {
    let config = Config {
        lexical_weight: 0.3,
        vector_weight: 0.7,
        ..Default::default()
    };

    let weights = config.fusion_weights();
    assert_eq!(weights.lexical, 0.3);
    assert_eq!(weights.vector, 0.7);
}
