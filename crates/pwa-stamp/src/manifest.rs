//! Manifest 改寫

use pwa_core::{PwaError, ReleaseVersion, Result};
use serde_json::Value;
use std::path::Path;

/// 寫入版本的欄位
pub const VERSION_FIELDS: [&str; 2] = ["version", "version_name"];

/// 將版本寫入 manifest 內容，其餘欄位與順序保持不變
pub fn rewrite(raw: &str, version: &ReleaseVersion, path: &Path) -> Result<String> {
    let mut manifest: Value = serde_json::from_str(raw).map_err(|e| PwaError::InvalidManifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let fields = manifest
        .as_object_mut()
        .ok_or_else(|| PwaError::InvalidManifest {
            path: path.to_path_buf(),
            reason: "頂層必須是 JSON 物件".to_string(),
        })?;

    for field in VERSION_FIELDS {
        fields.insert(field.to_string(), Value::String(version.to_string()));
    }

    let mut output = serde_json::to_string_pretty(&manifest).map_err(|e| {
        PwaError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;
    output.push('\n');
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_version_fields() {
        let raw = r#"{"version":"a","version_name":"a","name":"X"}"#;
        let version = ReleaseVersion::from_token("T");
        let output = rewrite(raw, &version, Path::new("manifest.json")).unwrap();

        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({"version": "T", "version_name": "T", "name": "X"})
        );
    }

    #[test]
    fn test_field_order_preserved() {
        let raw = r#"{"name":"EduCalc","version":"a","start_url":"/","version_name":"a"}"#;
        let version = ReleaseVersion::from_token("T");
        let output = rewrite(raw, &version, Path::new("manifest.json")).unwrap();

        let parsed: Value = serde_json::from_str(&output).unwrap();
        let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "version", "start_url", "version_name"]);
    }

    #[test]
    fn test_missing_fields_are_added() {
        let raw = r#"{"name":"X"}"#;
        let version = ReleaseVersion::from_token("T");
        let output = rewrite(raw, &version, Path::new("manifest.json")).unwrap();

        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["version"], "T");
        assert_eq!(parsed["version_name"], "T");
    }

    #[test]
    fn test_invalid_manifest() {
        let version = ReleaseVersion::from_token("T");

        let err = rewrite("{not json", &version, Path::new("manifest.json")).unwrap_err();
        assert!(matches!(err, PwaError::InvalidManifest { .. }));

        let err = rewrite("[1, 2]", &version, Path::new("manifest.json")).unwrap_err();
        assert!(matches!(err, PwaError::InvalidManifest { .. }));
    }
}
