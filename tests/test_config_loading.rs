//! Configuration loading and validation tests
//!
//! Tests focus on observable outcomes of loading, defaults, and error
//! reporting, not on TOML parsing internals.

use crime_etl_tools::config::{ConfigError, EtlConfig, ToolConfig, DEFAULT_DATABASE_URL_ENV};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[service]
id = "crime-etl-nightly"
description = "Nightly crime feed ingestion"

[database]
url_env = "CRIME_DB_URL"

[tools]
rss_scraper = "builtin"
postgres_loader = "builtin"
"#,
    );

    let config = EtlConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.service.id, "crime-etl-nightly");
    assert_eq!(config.service.description, "Nightly crime feed ingestion");
    assert_eq!(config.database.url_env, "CRIME_DB_URL");
    assert_eq!(config.tools.len(), 2);
}

#[test]
fn test_config_applies_default_database_env() {
    let temp_file = write_config(
        r#"
[tools]
postgres_loader = "builtin"
"#,
    );

    let config = EtlConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.database.url_env, DEFAULT_DATABASE_URL_ENV);
    assert_eq!(config.database.url_env, "POSTGRES_DB_URL");
}

#[test]
fn test_config_loads_with_complex_tool() {
    let temp_file = write_config(
        r#"
[tools.postgres_loader]
impl = "builtin"
config = { url_env = "OTHER_DB_URL" }
"#,
    );

    let config = EtlConfig::load_from_file(temp_file.path()).unwrap();

    match &config.tools["postgres_loader"] {
        ToolConfig::Complex {
            implementation,
            config,
        } => {
            assert_eq!(implementation, "builtin");
            assert_eq!(config["url_env"], "OTHER_DB_URL");
        }
        other => panic!("expected complex tool config, got {other:?}"),
    }
}

#[test]
fn test_config_returns_error_for_missing_file() {
    let result = EtlConfig::load_from_file(std::path::Path::new(
        "/nonexistent/crime-etl/config.toml",
    ));

    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_config_returns_error_for_malformed_toml() {
    let temp_file = write_config("[service\nid = ");

    let result = EtlConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_rejects_invalid_service_id() {
    let temp_file = write_config(
        r#"
[service]
id = "crime etl!"
"#,
    );

    let result = EtlConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::InvalidServiceId(_))));
}

#[test]
fn test_database_url_resolved_at_call_time() {
    let env_name = "CRIME_ETL_CONFIG_LOADING_TEST_URL";
    let config = EtlConfig::from_toml_str(&format!(
        r#"
[database]
url_env = "{env_name}"
"#
    ))
    .unwrap();

    std::env::remove_var(env_name);
    assert!(matches!(
        config.database.resolve_url(),
        Err(ConfigError::EnvVarNotFound(_))
    ));

    std::env::set_var(env_name, "postgres://localhost/crime");
    assert_eq!(
        config.database.resolve_url().unwrap(),
        "postgres://localhost/crime"
    );

    std::env::set_var(env_name, "");
    assert!(matches!(
        config.database.resolve_url(),
        Err(ConfigError::EnvVarNotFound(ref name)) if name == env_name
    ));

    std::env::remove_var(env_name);
}
