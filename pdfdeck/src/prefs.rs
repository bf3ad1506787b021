//! Persisted user preferences.
//!
//! Preferences are an opaque JSON object. Nothing in the library reads them;
//! the shell loads them at startup and writes them back on exit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{PdfDeckError, Result};

/// Key-value preferences backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    values: Map<String, Value>,
}

impl Preferences {
    /// Create empty preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load preferences from `path`.
    ///
    /// A missing file yields empty preferences.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::Preferences`] if the file cannot be read or is
    /// not a JSON object.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no preferences at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(preferences_error(path, e)),
        };

        serde_json::from_str(&contents).map_err(|e| preferences_error(path, e))
    }

    /// Save preferences to `path` as pretty-printed JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| preferences_error(path, e))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| preferences_error(path, e))
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn preferences_error(path: &Path, err: impl std::fmt::Display) -> PdfDeckError {
    PdfDeckError::Preferences {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
