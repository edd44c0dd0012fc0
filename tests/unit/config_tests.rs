// Configuration unit tests

use imgshift::config::*;
use imgshift::error::ConfigError;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_full_yaml_config() {
    let yaml = r#"
server:
  address: "127.0.0.1"
  port: 8080
  threads: 2
fetch:
  timeout_secs: 5
  max_source_bytes: 1048576
transform:
  max_width: 4096
  jpeg_quality: 90
scratch:
  directory: "/var/tmp/imgshift"
logging:
  level: "imgshift=debug"
  format: pretty
"#;
    let config = Config::from_yaml_with_env(yaml).expect("Failed to parse config");

    assert_eq!(config.server.listen_addr(), "127.0.0.1:8080");
    assert_eq!(config.server.threads, 2);
    assert_eq!(config.fetch.timeout().as_secs(), 5);
    assert_eq!(config.fetch.max_source_bytes, 1_048_576);
    assert_eq!(config.transform.max_width, 4096);
    assert_eq!(config.transform.jpeg_quality, 90);
    assert_eq!(config.scratch.directory, PathBuf::from("/var/tmp/imgshift"));
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config = Config::from_yaml_with_env("fetch:\n  timeout_secs: 10\n").unwrap();
    assert_eq!(config.fetch.timeout_secs, 10);
    assert_eq!(config.fetch.max_source_bytes, 50 * 1024 * 1024);
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.scratch.directory, PathBuf::from("files"));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let err = Config::from_yaml_with_env("server: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unknown_log_format_is_rejected() {
    let result = Config::from_yaml_with_env("logging:\n  format: xml\n");
    assert!(result.is_err());
}

#[test]
fn test_from_file_missing_is_read_error() {
    let err = Config::from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Read(_)));
}

#[test]
fn test_load_validates_file_contents() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  threads: 0").unwrap();

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_empty_port_override_is_ignored() {
    let mut config = Config::default();
    config
        .apply_env_overrides(|_| Some(String::new()))
        .unwrap();
    assert_eq!(config.server.port, 3000);
}

#[test]
fn test_validate_rejects_empty_scratch_directory() {
    let mut config = Config::default();
    config.scratch.directory = PathBuf::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_max_width() {
    let mut config = Config::default();
    config.transform.max_width = 0;
    assert!(config.validate().is_err());
}
