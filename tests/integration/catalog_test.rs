use hostprobe::{CounterCatalog, ProbeError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_catalog_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");
    fs::write(
        &path,
        r#"{"counters":[
            {"name":"cpu","path":"\\Processor(_Total)\\% Processor Time"},
            {"name":"mem","path":"\\Memory\\Available MBytes"}
        ]}"#,
    )
    .unwrap();

    let catalog = CounterCatalog::from_file(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.get("mem").map(|spec| spec.path.as_str()),
        Some("\\Memory\\Available MBytes")
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = CounterCatalog::from_file(temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ProbeError::Io(_)));
}

#[test]
fn test_invalid_entry_in_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");
    fs::write(&path, r#"{"counters":[{"name":"cpu","path":"Processor"}]}"#).unwrap();

    let err = CounterCatalog::from_file(&path).unwrap_err();
    assert!(matches!(err, ProbeError::Config(_)));
}

#[test]
fn test_default_catalog_covers_cpu_disk_memory() {
    let catalog = CounterCatalog::default();
    for name in ["cpu", "disk", "mem_available_mb"] {
        assert!(catalog.get(name).is_some(), "missing {}", name);
    }
}
