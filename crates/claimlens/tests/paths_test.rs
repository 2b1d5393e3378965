//! Project layout and config file loading.

use claimlens::{AnalysisConfig, ConfigError, ProjectPaths};
use std::fs;

fn scratch_root(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("claimlens-{name}-{}", std::process::id()))
}

#[test]
fn test_ensure_directories_creates_layout() {
    let root = scratch_root("layout");
    let paths = ProjectPaths::new(&root);

    paths.ensure_directories().unwrap();
    for dir in paths.directories() {
        assert!(dir.is_dir(), "{} missing", dir.display());
    }
    // idempotent
    paths.ensure_directories().unwrap();

    fs::remove_dir_all(root).ok();
}

#[test]
fn test_config_from_file() {
    let root = scratch_root("config");
    fs::create_dir_all(&root).unwrap();
    let path = root.join("config.json");
    fs::write(&path, r#"{"alpha": 0.1, "top_n": 5, "dimensions": ["Province"]}"#).unwrap();

    let config = AnalysisConfig::from_json_file(&path).unwrap();
    assert_eq!(config.alpha, 0.1);
    assert_eq!(config.top_n, 5);
    assert_eq!(config.dimensions, vec!["Province".to_string()]);
    assert_eq!(config.seed, 42);

    fs::remove_dir_all(root).ok();
}

#[test]
fn test_config_file_out_of_range() {
    let root = scratch_root("bad-config");
    fs::create_dir_all(&root).unwrap();
    let path = root.join("config.json");
    fs::write(&path, r#"{"alpha": 2.0}"#).unwrap();

    assert!(matches!(
        AnalysisConfig::from_json_file(&path),
        Err(ConfigError::Invalid(_))
    ));

    fs::remove_dir_all(root).ok();
}

#[test]
fn test_missing_config_file() {
    let path = scratch_root("absent").join("config.json");
    assert!(matches!(
        AnalysisConfig::from_json_file(&path),
        Err(ConfigError::Io(_))
    ));
}
