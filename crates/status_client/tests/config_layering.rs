use std::collections::HashMap;
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use status_client::config::{
    ClientConfig, DEFAULT_API_URL, ENV_API_URL, ENV_RECENT_COUNT, ENV_TIMEOUT_MS,
};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_are_valid() {
    let cfg = ClientConfig::default().validate().expect("valid");
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.recent_count, 10);
    assert_eq!(cfg.timeout().as_millis(), 10_000);
}

#[test]
fn file_then_env_then_validate() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("statusboard.json");
    fs::write(&path, r#"{ "api_url": "https://file.example.com/", "recent_count": 25 }"#).unwrap();

    let from_file = ClientConfig::from_json_file(&path).expect("file");
    assert_eq!(from_file.api_url, "https://file.example.com/");
    assert_eq!(from_file.recent_count, 25);
    assert_eq!(from_file.timeout_ms, 10_000);

    let layered = from_file
        .apply_env(env(&[(ENV_API_URL, "https://env.example.com"), (ENV_TIMEOUT_MS, "2500")]))
        .expect("env")
        .validate()
        .expect("valid");
    assert_eq!(layered.api_url, "https://env.example.com");
    assert_eq!(layered.timeout_ms, 2500);
    assert_eq!(layered.recent_count, 25);
}

#[test]
fn blank_env_url_is_ignored() {
    let cfg = ClientConfig::default()
        .apply_env(env(&[(ENV_API_URL, "   ")]))
        .expect("env");
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
}

#[test]
fn recent_count_is_clamped() {
    let high = ClientConfig::default()
        .apply_env(env(&[(ENV_RECENT_COUNT, "51")]))
        .and_then(ClientConfig::validate)
        .expect("valid");
    assert_eq!(high.recent_count, 50);

    let low = ClientConfig {
        recent_count: 0,
        ..ClientConfig::default()
    }
    .validate()
    .expect("valid");
    assert_eq!(low.recent_count, 1);
}

#[test]
fn invalid_values_are_config_errors() {
    let err = ClientConfig::default()
        .apply_env(env(&[(ENV_TIMEOUT_MS, "soon")]))
        .expect_err("not a number");
    assert_eq!(err.code, "CONFIG_INVALID");

    let err = ClientConfig {
        timeout_ms: 0,
        ..ClientConfig::default()
    }
    .validate()
    .expect_err("zero timeout");
    assert_eq!(err.code, "CONFIG_INVALID");

    let err = ClientConfig {
        api_url: "status.example.com".to_string(),
        ..ClientConfig::default()
    }
    .validate()
    .expect_err("no scheme");
    assert_eq!(err.code, "CONFIG_INVALID");
}

#[test]
fn unreadable_or_malformed_file_is_reported() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("missing.json");
    let err = ClientConfig::from_json_file(&missing).expect_err("missing");
    assert_eq!(err.code, "CONFIG_READ_FAILED");

    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    let err = ClientConfig::from_json_file(&bad).expect_err("malformed");
    assert_eq!(err.code, "CONFIG_INVALID");
}
