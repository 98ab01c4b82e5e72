use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::config::{normalize_module_dir, ConfigError, ConfigFormat, KernelConfig};
use crate::kernel::constants::{DEFAULT_MODULE_DIR, DEFAULT_MODULE_EXTENSION};

#[test]
fn test_defaults() {
    let config = KernelConfig::default();
    assert_eq!(config.module_dir(), Path::new(DEFAULT_MODULE_DIR));
    assert_eq!(config.module_extension(), DEFAULT_MODULE_EXTENSION);
    assert!(config.modules().is_none());
    assert!(!config.global_registry());
}

#[test]
fn test_normalize_module_dir() {
    assert_eq!(normalize_module_dir(Path::new("modules/")), PathBuf::from("modules"));
    assert_eq!(normalize_module_dir(Path::new("modules///")), PathBuf::from("modules"));
    assert_eq!(normalize_module_dir(Path::new("a/b")), PathBuf::from("a/b"));
    assert_eq!(normalize_module_dir(Path::new("")), PathBuf::from("."));
    assert_eq!(normalize_module_dir(Path::new("/")), PathBuf::from("/"));
}

#[test]
fn test_builder_normalizes_inputs() {
    let config = KernelConfig::new("plugins/")
        .with_module_extension(".so")
        .with_modules(vec!["a".to_string(), "b".to_string()])
        .with_global_registry(true);

    assert_eq!(config.module_dir(), Path::new("plugins"));
    assert_eq!(config.module_extension(), "so");
    assert_eq!(config.modules(), Some(&["a".to_string(), "b".to_string()][..]));
    assert!(config.global_registry());
}

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("k.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("K.JSON")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("k.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("noext")), None);
}

#[test]
fn test_from_json_file_fills_missing_keys_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kernel.json");
    fs::write(&path, r#"{ "module_dir": "/srv/modules/", "modules": ["log-sink"] }"#).unwrap();

    let config = KernelConfig::from_file(&path).unwrap();

    assert_eq!(config.module_dir(), Path::new("/srv/modules"));
    assert_eq!(config.module_extension(), DEFAULT_MODULE_EXTENSION);
    assert_eq!(config.modules(), Some(&["log-sink".to_string()][..]));
    assert!(!config.global_registry());
}

#[cfg(feature = "toml-config")]
#[test]
fn test_from_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kernel.toml");
    fs::write(
        &path,
        "module_dir = \"mods\"\nmodule_extension = \".dylib\"\nglobal_registry = true\n",
    )
    .unwrap();

    let config = KernelConfig::from_file(&path).unwrap();

    assert_eq!(config.module_dir(), Path::new("mods"));
    assert_eq!(config.module_extension(), "dylib");
    assert!(config.global_registry());
    assert_eq!(ConfigFormat::from_path(&path), Some(ConfigFormat::Toml));
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_from_yaml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kernel.yml");
    fs::write(&path, "module_dir: ''\nmodules:\n  - a\n  - b\n").unwrap();

    let config = KernelConfig::from_file(&path).unwrap();

    assert_eq!(config.module_dir(), Path::new("."));
    assert_eq!(config.modules().map(|m| m.len()), Some(2));
}

#[test]
fn test_unsupported_extension_is_rejected_before_reading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kernel.ini");

    let err = KernelConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { path: p } if p == path));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = KernelConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kernel.json");
    fs::write(&path, "{ \"module_dir\": 42 }").unwrap();

    let err = KernelConfig::from_file(&path).unwrap_err();
    match err {
        ConfigError::Parse { format, .. } => assert_eq!(format, "JSON"),
        other => panic!("unexpected error: {}", other),
    }
}
