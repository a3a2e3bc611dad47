use autosnap_config::{AppConfig, ConfigLoader, CONFIG_ENV};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn test_explicit_path_wins() {
    std::env::remove_var(CONFIG_ENV);
    let dir = TempDir::new().unwrap();
    let explicit = write(&dir, "explicit.yaml", "snapshot:\n  prefix: explicit_\n");
    let fallback = write(&dir, "fallback.yaml", "snapshot:\n  prefix: fallback_\n");

    let config = ConfigLoader::new(Some(explicit.clone()))
        .with_search_paths(vec![fallback])
        .load()
        .unwrap();

    assert_eq!(config.snapshot.prefix, "explicit_");
    assert_eq!(config.source_path, Some(explicit));
}

#[test]
#[serial]
fn test_missing_explicit_path_is_error() {
    std::env::remove_var(CONFIG_ENV);
    let dir = TempDir::new().unwrap();
    let fallback = write(&dir, "fallback.yaml", "");

    let err = ConfigLoader::new(Some(dir.path().join("nope.yaml")))
        .with_search_paths(vec![fallback])
        .load()
        .unwrap_err();

    assert!(err.to_string().contains("Config file not found"));
}

#[test]
#[serial]
fn test_env_var_used_before_search_paths() {
    let dir = TempDir::new().unwrap();
    let from_env = write(&dir, "env.yaml", "filter:\n  all: true\n");
    let fallback = write(&dir, "fallback.yaml", "filter:\n  all: false\n");

    std::env::set_var(CONFIG_ENV, &from_env);
    let result = ConfigLoader::new(None)
        .with_search_paths(vec![fallback])
        .load();
    std::env::remove_var(CONFIG_ENV);

    let config = result.unwrap();
    assert!(config.filter.all);
    assert_eq!(config.source_path, Some(from_env));
}

#[test]
#[serial]
fn test_first_existing_search_path() {
    std::env::remove_var(CONFIG_ENV);
    let dir = TempDir::new().unwrap();
    let second = write(&dir, "second.yaml", "pvesh:\n  binary: /opt/pvesh\n");

    let config = ConfigLoader::new(None)
        .with_search_paths(vec![dir.path().join("first.yaml"), second])
        .load()
        .unwrap();

    assert_eq!(config.pvesh.binary, "/opt/pvesh");
}

#[test]
#[serial]
fn test_nothing_found_gives_defaults() {
    std::env::remove_var(CONFIG_ENV);
    let dir = TempDir::new().unwrap();

    let loader = ConfigLoader::new(None).with_search_paths(vec![dir.path().join("none.yaml")]);

    assert_eq!(loader.resolve().unwrap(), None);
    assert_eq!(loader.load().unwrap(), AppConfig::default());
}

#[test]
#[serial]
fn test_parse_error_names_file() {
    std::env::remove_var(CONFIG_ENV);
    let dir = TempDir::new().unwrap();
    let broken = write(&dir, "broken.yaml", "filter:\n  steps:\n    - sideways: {}\n");

    let err = ConfigLoader::new(Some(broken)).load().unwrap_err();

    assert!(format!("{:#}", err).contains("broken.yaml"));
}
