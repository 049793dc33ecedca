//! Persistent key/value preferences stored as a JSON object.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Preferences {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferenceStore {
    /// Read the store at `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let prefs = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse preferences {}", path.display()))?
        } else {
            Preferences::default()
        };
        Ok(Self { path, prefs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.prefs.values.get(key).and_then(Value::as_bool)
    }

    /// Set `key` and write the whole store back to disk.
    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.prefs.values.insert(key.to_string(), Value::Bool(value));
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.prefs)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences {}", self.path.display()))
    }
}
