use crate::domain::model::StoreKey;
use crate::domain::ports::SessionStore;
use crate::utils::error::{PathplanError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory session. Clones share the same slots, like views in one browser tab.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slots: Arc<Mutex<HashMap<StoreKey, Value>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<StoreKey, Value>>> {
        self.slots
            .lock()
            .map_err(|_| PathplanError::store("in-memory session lock poisoned"))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.slots()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: StoreKey) -> Result<Option<Value>> {
        Ok(self.slots()?.get(&key).filter(|v| !v.is_null()).cloned())
    }

    fn set(&self, key: StoreKey, value: Value) -> Result<()> {
        self.slots()?.insert(key, value);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.slots()?.clear();
        Ok(())
    }
}
