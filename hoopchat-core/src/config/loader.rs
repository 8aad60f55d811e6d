//! Layered config loading: defaults, then `config.json`, then environment

use super::schema::Config;
use super::validate::validate_config;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.json";

/// Prefix for path overrides, e.g. `HOOPCHAT__API__TIMEOUT_SECS=30`
const ENV_PREFIX: &str = "HOOPCHAT__";

/// Short env names mapped onto config paths. Path overrides win over these.
const ENV_ALIASES: &[(&str, &[&str])] = &[("HOOPCHAT_API_URL", &["api", "base_url"])];

/// Loads and saves `config.json` in a config directory
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Loader for `~/.hoopchat`
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .map(|home| home.join(".hoopchat"))
            .unwrap_or_else(|| PathBuf::from(".hoopchat"));
        Self { config_dir }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            config_dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load using the process environment
    pub fn load(&self) -> crate::Result<Config> {
        self.load_with_env(std::env::vars())
    }

    /// Load using the given environment variables instead of the process's
    pub fn load_with_env<I>(&self, env: I) -> crate::Result<Config>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: BTreeMap<String, String> = env.into_iter().collect();
        let mut layered = serde_json::to_value(Config::default())?;

        let path = self.config_dir.join(CONFIG_FILE);
        if path.exists() {
            debug!("Reading config file {}", path.display());
            let file: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            overlay(&mut layered, file);
        }

        for (name, target) in ENV_ALIASES {
            if let Some(value) = env.get(*name) {
                debug!("Config {} set from {}", target.join("."), name);
                insert_at(&mut layered, target, Value::String(value.clone()));
            }
        }

        for (name, raw) in &env {
            let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let target: Vec<String> = rest
                .split("__")
                .filter(|segment| !segment.is_empty())
                .map(str::to_ascii_lowercase)
                .collect();
            if target.is_empty() {
                continue;
            }
            debug!("Config {} set from {}", target.join("."), name);
            let target: Vec<&str> = target.iter().map(String::as_str).collect();
            insert_at(&mut layered, &target, env_value(raw));
        }

        let config: Config = serde_json::from_value(layered)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Write `config` as pretty JSON, creating the directory if needed
    pub fn save(&self, config: &Config) -> crate::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(self.config_dir.join(CONFIG_FILE), json)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep-merge `top` into `base`; objects merge key by key, anything else
/// replaces
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Set the value at `path`, replacing non-objects on the way with objects
fn insert_at(root: &mut Value, path: &[&str], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *root = value;
        return;
    };
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    if let Value::Object(map) = root {
        let child = map.entry(head.to_string()).or_insert(Value::Null);
        insert_at(child, rest, value);
    }
}

/// Env values are JSON when they parse as JSON (numbers, booleans, arrays),
/// otherwise plain strings
fn env_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
