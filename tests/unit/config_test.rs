//! Tests for configuration validation

use sched_quota::config::{QuotaConfig, StackConfig};

#[test]
fn test_default_config_is_valid() {
    let config = StackConfig::default();
    assert_eq!(config.region, "global");
    assert!(config.quota.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_region_is_invalid() {
    let config = StackConfig {
        region: String::new(),
        quota: QuotaConfig::default(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "region": "europe",
        "quota": { "enabled": false }
    }"#;

    let config = StackConfig::from_json_str(json).unwrap();
    assert_eq!(config.region, "europe");
    assert!(!config.quota.enabled);
}

#[test]
fn test_config_from_json_defaults() {
    let config = StackConfig::from_json_str("{}").unwrap();
    assert_eq!(config, StackConfig::default());

    let config = StackConfig::from_json_str(r#"{ "quota": {} }"#).unwrap();
    assert!(config.quota.enabled);
}

#[test]
fn test_config_from_json_rejects_blank_region() {
    let err = StackConfig::from_json_str(r#"{ "region": "" }"#).unwrap_err();
    assert_eq!(err, "region must not be empty");
}

#[test]
fn test_config_from_json_parse_error() {
    let err = StackConfig::from_json_str(r#"{ "region": 5 }"#).unwrap_err();
    assert!(err.starts_with("parse error"));
}
