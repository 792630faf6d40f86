use std::collections::HashMap;
use std::path::PathBuf;

use beacon::config::{Config, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_CLIENTS, DEFAULT_PORT, Verbosity};
use tracing::level_filters::LevelFilter;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.port, 9999);
    assert_eq!(cfg.static_root, None);
    assert_eq!(cfg.max_clients, DEFAULT_MAX_CLIENTS);
    assert_eq!(cfg.max_body_size, DEFAULT_MAX_BODY_SIZE);
    assert_eq!(cfg.max_body_size, 10 * 1024 * 1024);
    assert_eq!(cfg.verbosity, Verbosity::Info);
    assert_eq!(cfg.listen_addr(), "0.0.0.0:9999");
}

#[test]
fn test_config_overrides() {
    let mut cfg = Config::default();
    cfg.apply_overrides(lookup(&[
        ("BEACON_HOST", "127.0.0.1"),
        ("BEACON_PORT", "8081"),
        ("BEACON_STATIC_ROOT", "/srv/www"),
        ("BEACON_MAX_CLIENTS", "64"),
        ("BEACON_MAX_BODY_SIZE", "4096"),
        ("BEACON_VERBOSITY", "DEBUG"),
    ]))
    .unwrap();

    assert_eq!(cfg.listen_addr(), "127.0.0.1:8081");
    assert_eq!(cfg.static_root, Some(PathBuf::from("/srv/www")));
    assert_eq!(cfg.max_clients, 64);
    assert_eq!(cfg.max_body_size, 4096);
    assert_eq!(cfg.verbosity, Verbosity::Debug);
}

#[test]
fn test_config_no_overrides_keeps_values() {
    let mut cfg = Config::default();
    cfg.apply_overrides(lookup(&[])).unwrap();

    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_empty_static_root_disables() {
    let mut cfg = Config {
        static_root: Some(PathBuf::from("/srv")),
        ..Config::default()
    };
    cfg.apply_overrides(lookup(&[("BEACON_STATIC_ROOT", "")])).unwrap();

    assert_eq!(cfg.static_root, None);
}

#[test]
fn test_config_invalid_values_are_errors() {
    let mut cfg = Config::default();
    let err = cfg
        .apply_overrides(lookup(&[("BEACON_PORT", "not-a-port")]))
        .unwrap_err();
    assert!(err.to_string().contains("BEACON_PORT"));

    let err = cfg
        .apply_overrides(lookup(&[("BEACON_VERBOSITY", "chatty")]))
        .unwrap_err();
    assert!(err.to_string().contains("BEACON_VERBOSITY"));
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml_str(
        "port: 8000\nstatic_root: ./public\nmax_clients: 2\nverbosity: error\n",
    )
    .unwrap();

    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.static_root, Some(PathBuf::from("./public")));
    assert_eq!(cfg.max_clients, 2);
    assert_eq!(cfg.verbosity, Verbosity::Error);
    // unspecified fields keep their defaults
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.max_body_size, DEFAULT_MAX_BODY_SIZE);
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("beacon.yaml");
    std::fs::write(&path, "host: \"::1\"\nport: 7000\n").unwrap();

    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.listen_addr(), "[::1]:7000");

    assert!(Config::from_file(dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_verbosity_levels() {
    assert_eq!(Verbosity::None.level_filter(), LevelFilter::OFF);
    assert_eq!(Verbosity::Error.level_filter(), LevelFilter::ERROR);
    assert_eq!(Verbosity::Info.level_filter(), LevelFilter::INFO);
    assert_eq!(Verbosity::Debug.level_filter(), LevelFilter::DEBUG);
    assert!(Verbosity::Debug > Verbosity::Info);
    assert_eq!(Verbosity::from_str(" none "), Some(Verbosity::None));
}
