//! Configuration loading tests.

mod common;

use std::io::Write;

use oxirecord::access::DirectRecordAccess;
use oxirecord::config::{ConfigError, OxirecordConfig};

use common::{CountingLoader, FaultInjectionStore, TestAccess};

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[access]\npool_capacity = 12\ninitial_pool_size = 3\ntrack_stats = true"
    )
    .unwrap();

    let config = OxirecordConfig::load_from_path(file.path()).unwrap();
    let access = config.to_access_config();
    assert_eq!(access.pool_capacity, 12);
    assert_eq!(access.initial_pool_size, 3);
    assert!(access.track_stats);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = OxirecordConfig::load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_load_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[access\npool_capacity = ").unwrap();

    let err = OxirecordConfig::load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = OxirecordConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.to_access_config(), Default::default());
}

#[test]
fn test_config_drives_access() {
    let config = OxirecordConfig::from_toml_str("[access]\npool_capacity = 2\ninitial_pool_size = 2\n")
        .unwrap()
        .to_access_config();

    let backing = oxirecord::store::MemoryRecordStore::new();
    let mut access: TestAccess = DirectRecordAccess::with_config(
        CountingLoader::new(backing.clone()),
        FaultInjectionStore::new(backing),
        config,
    );
    assert_eq!(access.pool_available(), 2);

    for key in 0..5 {
        access.create(key, 0).unwrap();
    }
    access.commit().unwrap();
    assert_eq!(access.pool_available(), 2);
    assert_eq!(access.config().pool_capacity, 2);
}
