//! Key-value storage for user preferences

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Minimal string key-value persistence
pub trait PreferenceStorage {
    /// Read a value, `None` when the key was never written
    fn read(&self, key: &str) -> crate::Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn write(&mut self, key: &str, value: &str) -> crate::Result<()>;
}

/// Storage that lives only as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl PreferenceStorage for MemoryPreferences {
    fn read(&self, key: &str) -> crate::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object in `preferences.json`
///
/// The whole file is rewritten on every write.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FilePreferences {
    pub const FILE_NAME: &'static str = "preferences.json";

    /// Open the preferences file in `dir`, starting empty if it is missing
    pub fn open<P: AsRef<Path>>(dir: P) -> crate::Result<Self> {
        let path = dir.as_ref().join(Self::FILE_NAME);
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => map,
                other => {
                    return Err(crate::Error::Storage(format!(
                        "{} must hold a JSON object, found {}",
                        path.display(),
                        other
                    )))
                }
            }
        } else {
            Map::new()
        };
        debug!("Opened preferences at {}", path.display());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStorage for FilePreferences {
    fn read(&self, key: &str) -> crate::Result<Option<String>> {
        Ok(self
            .values
            .get(key)
            .and_then(|v| v.as_str())
            .map(ToString::to_string))
    }

    fn write(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_read_write() {
        let mut prefs = MemoryPreferences::new();
        assert_eq!(prefs.read("theme").unwrap(), None);
        prefs.write("theme", "dark").unwrap();
        assert_eq!(prefs.read("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_round_trip_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = FilePreferences::open(temp_dir.path()).unwrap();
        prefs.write("theme", "dark").unwrap();

        let reopened = FilePreferences::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.read("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_creates_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let mut prefs = FilePreferences::open(&nested).unwrap();
        prefs.write("theme", "light").unwrap();
        assert!(nested.join(FilePreferences::FILE_NAME).exists());
    }

    #[test]
    fn test_file_keeps_unrelated_keys() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(FilePreferences::FILE_NAME),
            r#"{"font":"large"}"#,
        )
        .unwrap();

        let mut prefs = FilePreferences::open(temp_dir.path()).unwrap();
        prefs.write("theme", "dark").unwrap();

        let reopened = FilePreferences::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.read("font").unwrap().as_deref(), Some("large"));
    }

    #[test]
    fn test_file_rejects_non_object() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(FilePreferences::FILE_NAME), "[1,2]").unwrap();

        let err = FilePreferences::open(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }
}
