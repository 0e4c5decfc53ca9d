//! # Configuration Loading Tests
//!
//! File-based configuration loading with humantime durations and
//! environment overrides.

use anyhow::Result;
use marketplace_client::{ClientConfig, ErrorKind};
use std::io::Write;
use std::time::Duration;

#[tokio::test]
async fn test_load_from_yaml_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"
base_url: "https://api.example.com/v1/"
user_agent: "marketplace-client/test"
timeouts:
  suggestion: 3s
  listing: 12s
  upload: 30s
cache:
  default_ttl: 5m
  max_entries: 250
  sweep_interval: 45s
debounce:
  quiet_period: 250ms
  min_query_len: 3
"#
    )?;

    let config = ClientConfig::load_from_file(file.path()).await?;

    assert_eq!(config.base_url, "https://api.example.com/v1/");
    assert_eq!(config.timeouts.listing, Duration::from_secs(12));
    assert_eq!(config.cache.default_ttl, Duration::from_secs(300));
    assert_eq!(config.cache.max_entries, 250);
    assert_eq!(config.debounce.quiet_period, Duration::from_millis(250));
    assert_eq!(config.debounce.min_query_len, 3);
    Ok(())
}

#[tokio::test]
async fn test_malformed_file_is_a_config_error() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "base_url: [this is not a string")?;

    let err = ClientConfig::load_from_file(file.path()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_a_config_error() {
    let err = ClientConfig::load_from_file("/nonexistent/marketplace.yaml")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[tokio::test]
async fn test_invalid_base_url_in_file_is_rejected() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"
base_url: "ftp://files.example.com/"
user_agent: "marketplace-client/test"
timeouts:
  suggestion: 3s
  listing: 10s
  upload: 30s
cache:
  default_ttl: 5m
  max_entries: 1000
  sweep_interval: 1m
debounce:
  quiet_period: 300ms
  min_query_len: 2
"#
    )?;

    let err = ClientConfig::load_from_file(file.path()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    Ok(())
}
