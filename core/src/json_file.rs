//! JSON file helpers shared by the canonical and mirror loaders.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CliError;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    serde_json::from_str::<T>(&content).map_err(|e| CliError::json(path, e))
}

/// Serialize with 4-space indentation and a trailing newline.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Replace `path` with the serialized document.
///
/// The content goes to a sibling temp file first and is renamed over the
/// target, so a failed write leaves the previous file untouched.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = to_pretty_json(value).map_err(|e| CliError::json(path, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document.json".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    std::fs::write(&tmp, json).map_err(|e| CliError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        CliError::io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn pretty_json_uses_four_spaces() {
        let out = to_pretty_json(&json!({"name": "product", "roles": ["product"]})).unwrap();
        assert_eq!(
            out,
            "{\n    \"name\": \"product\",\n    \"roles\": [\n        \"product\"\n    ]\n}\n"
        );
    }

    #[test]
    fn write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write_json(&path, &json!({"a": 1})).unwrap();
        let back: Value = read_json(&path).unwrap();
        assert_eq!(back, json!({"a": 1}));
        assert!(!dir.path().join(".doc.json.tmp").exists());
    }

    #[test]
    fn read_reports_missing_file_as_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<Value>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn read_reports_bad_json_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json::<Value>(&path).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn failed_overwrite_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write_json(&path, &json!({"keywords": ["Gold Foil"]})).unwrap();
        let before = std::fs::read(&path).unwrap();

        // a directory squatting on the temp name makes the first write fail
        std::fs::create_dir(dir.path().join(".doc.json.tmp")).unwrap();
        let err = write_json(&path, &json!({"keywords": []})).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));

        assert_eq!(std::fs::read(&path).unwrap(), before);
        let back: Value = read_json(&path).unwrap();
        assert_eq!(back, json!({"keywords": ["Gold Foil"]}));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("doc.json");
        let err = write_json(&path, &json!({})).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
