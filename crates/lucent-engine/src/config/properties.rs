use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse properties: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("top-level property `{0}` must be an object of keys")]
    NotAnObject(String),
}

/// Sectioned key/value settings.
///
/// Stored as JSON: `{ "window": { "monitor": 1, "title": "demo" } }`.
/// Lookups never fail; a missing or mistyped key yields the caller's default.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    sections: HashMap<String, Map<String, Value>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let root: Map<String, Value> = serde_json::from_str(text)?;
        let mut sections = HashMap::with_capacity(root.len());
        for (name, value) in root {
            match value {
                Value::Object(keys) => {
                    sections.insert(name, keys);
                }
                _ => return Err(ConfigError::NotAnObject(name)),
            }
        }
        Ok(Self { sections })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Loads `path`, falling back to empty properties when the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::warn!("no properties file at {}; using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.get(key)
    }

    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get(section, key).and_then(Value::as_i64).unwrap_or(default)
    }

    pub fn get_float(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get(section, key).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Accepts JSON booleans and integers (non-zero is `true`).
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get(section, key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map_or(default, |v| v != 0),
            _ => default,
        }
    }

    pub fn get_str<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).and_then(Value::as_str).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"{
        "window": { "monitor": 2, "title": "demo", "fullscreen": 1 },
        "graphics": { "max_fps": 60, "vsync": false, "scale": 1.5 }
    }"#;

    #[test]
    fn typed_lookups() {
        let p = Properties::from_json_str(SAMPLE).unwrap();
        assert_eq!(p.get_int("window", "monitor", 0), 2);
        assert_eq!(p.get_str("window", "title", "x"), "demo");
        assert!(p.get_bool("window", "fullscreen", false));
        assert!(!p.get_bool("graphics", "vsync", true));
        assert_eq!(p.get_float("graphics", "scale", 1.0), 1.5);
    }

    #[test]
    fn missing_or_mistyped_keys_use_default() {
        let p = Properties::from_json_str(SAMPLE).unwrap();
        assert_eq!(p.get_int("window", "width", 1280), 1280);
        assert_eq!(p.get_int("audio", "volume", 7), 7);
        assert_eq!(p.get_int("window", "title", 5), 5);
        assert_eq!(p.get_str("graphics", "max_fps", "none"), "none");
    }

    #[test]
    fn non_object_section_is_rejected() {
        let err = Properties::from_json_str(r#"{ "window": 3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject(name) if name == "window"));
        assert!(matches!(
            Properties::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn set_overrides_and_creates_sections() {
        let mut p = Properties::new();
        p.set("window", "monitor", 1);
        assert_eq!(p.get_int("window", "monitor", 0), 1);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let p = Properties::load(file.path()).unwrap();
        assert_eq!(p.get_int("graphics", "max_fps", 0), 60);
    }

    #[test]
    fn absent_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = Properties::load_or_default(dir.path().join("missing.json")).unwrap();
        assert_eq!(p.get_int("window", "monitor", 0), 0);
        assert!(matches!(
            Properties::load(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
