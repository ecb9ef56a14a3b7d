use crate::core::{ConfigProvider, SessionStore, StoreKey};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionDocument {
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

/// Session slots kept in a JSON file so results survive between CLI invocations.
/// The file appears on first write and disappears on `clear`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.session_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn created_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.load()?.created_at)
    }

    fn load(&self) -> Result<SessionDocument> {
        if !self.path.exists() {
            return Ok(SessionDocument::default());
        }
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn save(&self, document: &SessionDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(document)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: StoreKey) -> Result<Option<Value>> {
        Ok(self
            .load()?
            .entries
            .remove(key.as_str())
            .filter(|v| !v.is_null()))
    }

    fn set(&self, key: StoreKey, value: Value) -> Result<()> {
        let mut document = self.load()?;
        document.created_at.get_or_insert_with(Utc::now);
        document.entries.insert(key.as_str().to_string(), value);
        tracing::debug!("Session slot {} written to {}", key, self.path.display());
        self.save(&document)
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
