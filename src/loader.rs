// src/loader.rs
//! Reads one dataset file into raw records.

use crate::error::LoadError;
use serde_json::Value;
use std::path::Path;

/// Loads `directory/filename` as a JSON array of records.
///
/// Every call reads the file again; nothing is cached.
pub fn load(directory: &Path, filename: &str) -> Result<Vec<Value>, LoadError> {
    let path = directory.join(filename);
    if !path.is_file() {
        return Err(LoadError::NotFound { path });
    }

    let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    let parsed: Value = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.clone(),
        source,
    })?;

    match parsed {
        Value::Array(records) => {
            log::info!("Loaded {} records from {}", records.len(), path.display());
            Ok(records)
        }
        other => Err(LoadError::NotAnArray {
            path,
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_loads_record_array() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("5e-SRD-Conditions.json"),
            r#"[{"index": "blinded", "name": "Blinded"}, {"index": "charmed", "name": "Charmed"}]"#,
        )
        .unwrap();

        let records = load(dir.path(), "5e-SRD-Conditions.json").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], "Charmed");
    }

    #[test]
    fn test_object_keys_keep_file_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("5e-SRD-Monsters.json"),
            r#"[{"index": "crocodile", "speed": {"walk": "20 ft.", "swim": "30 ft."}}]"#,
        )
        .unwrap();

        let records = load(dir.path(), "5e-SRD-Monsters.json").unwrap();
        let keys: Vec<&str> = records[0]["speed"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["walk", "swim"]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), "absent.json").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_malformed_and_non_array_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "[{\"name\": ").unwrap();
        fs::write(dir.path().join("object.json"), "{\"name\": \"x\"}").unwrap();

        assert!(matches!(
            load(dir.path(), "broken.json"),
            Err(LoadError::Parse { .. })
        ));
        assert!(matches!(
            load(dir.path(), "object.json"),
            Err(LoadError::NotAnArray { found: "an object", .. })
        ));
    }
}
