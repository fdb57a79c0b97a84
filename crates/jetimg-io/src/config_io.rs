use jetimg_core::{JetImageError, JetImageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Save any serializable configuration as pretty JSON.
pub fn save_json<C: Serialize>(value: &C, path: impl AsRef<Path>) -> JetImageResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| JetImageError::Serialization(format!("JSON error: {}", e)))?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Load a configuration from a JSON file.
pub fn load_json<C: DeserializeOwned>(path: impl AsRef<Path>) -> JetImageResult<C> {
    let json = fs::read_to_string(path.as_ref())?;
    serde_json::from_str(&json).map_err(|e| {
        JetImageError::Serialization(format!("{}: {}", path.as_ref().display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetimg_core::{CodecConfig, RangePolicy};

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");
        let config = CodecConfig {
            bins_eta: 32,
            range_policy: RangePolicy::Reject,
            ..CodecConfig::default()
        };
        save_json(&config, &path).unwrap();
        let loaded: CodecConfig = load_json(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<CodecConfig>(&path).unwrap_err();
        assert!(matches!(err, JetImageError::Serialization(_)));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_json::<CodecConfig>("/nonexistent/jetimg/config.json").unwrap_err();
        assert!(matches!(err, JetImageError::Io(_)));
    }
}
