//! Persistent store contract: named collections of JSON records plus a flat
//! settings map.

use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Top-level record collections. Settings live in their own map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Problems,
    Sessions,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Problems, Collection::Sessions];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Problems => "problems",
            Collection::Sessions => "sessions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value persistence consumed by the core.
///
/// No transactional guarantees span calls; callers run single-threaded.
/// `set_settings` is the one write that applies several values all or nothing.
pub trait Store {
    /// All records of a collection in insertion order (empty if never written).
    fn get_all(&self, collection: Collection) -> AppResult<Vec<Value>>;

    /// Append a record. The record must carry a string `id` unique in the collection.
    fn save(&mut self, collection: Collection, record: Value) -> AppResult<Value>;

    /// Shallow-merge `patch` into the record with `id`; `None` when absent.
    fn put(&mut self, collection: Collection, id: &str, patch: Value) -> AppResult<Option<Value>>;

    fn remove(&mut self, collection: Collection, id: &str) -> AppResult<()>;

    fn clear_collection(&mut self, collection: Collection) -> AppResult<()>;

    /// Clear every collection and all settings.
    fn clear_all(&mut self) -> AppResult<()>;

    fn setting(&self, name: &str) -> AppResult<Option<Value>>;

    fn set_setting(&mut self, name: &str, value: Value) -> AppResult<()>;

    /// Write several settings at once; on error none of them is applied.
    fn set_settings(&mut self, entries: &[(&str, Value)]) -> AppResult<()>;

    fn get_all_settings(&self) -> AppResult<Map<String, Value>>;
}

/// Extract the `id` of a record.
pub fn record_id(record: &Value) -> AppResult<String> {
    record
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::Other("record has no string 'id' field".into()))
}

/// Merge the top-level keys of `patch` into `record`.
pub fn merge_patch(record: &mut Value, patch: Value) -> AppResult<()> {
    let (Some(target), Value::Object(fields)) = (record.as_object_mut(), patch) else {
        return Err(AppError::Other("patch and record must be JSON objects".into()));
    };
    for (k, v) in fields {
        target.insert(k, v);
    }
    Ok(())
}

/// Volatile store used by tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: HashMap<Collection, Vec<Value>>,
    settings: Map<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_all(&self, collection: Collection) -> AppResult<Vec<Value>> {
        Ok(self.collections.get(&collection).cloned().unwrap_or_default())
    }

    fn save(&mut self, collection: Collection, record: Value) -> AppResult<Value> {
        let id = record_id(&record)?;
        let items = self.collections.entry(collection).or_default();
        if items.iter().any(|r| record_id(r).is_ok_and(|rid| rid == id)) {
            return Err(AppError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }
        items.push(record.clone());
        Ok(record)
    }

    fn put(&mut self, collection: Collection, id: &str, patch: Value) -> AppResult<Option<Value>> {
        let Some(items) = self.collections.get_mut(&collection) else {
            return Ok(None);
        };
        for item in items.iter_mut() {
            if record_id(item).is_ok_and(|rid| rid == id) {
                merge_patch(item, patch)?;
                return Ok(Some(item.clone()));
            }
        }
        Ok(None)
    }

    fn remove(&mut self, collection: Collection, id: &str) -> AppResult<()> {
        if let Some(items) = self.collections.get_mut(&collection) {
            items.retain(|r| !record_id(r).is_ok_and(|rid| rid == id));
        }
        Ok(())
    }

    fn clear_collection(&mut self, collection: Collection) -> AppResult<()> {
        self.collections.remove(&collection);
        Ok(())
    }

    fn clear_all(&mut self) -> AppResult<()> {
        self.collections.clear();
        self.settings.clear();
        Ok(())
    }

    fn setting(&self, name: &str) -> AppResult<Option<Value>> {
        Ok(self.settings.get(name).cloned())
    }

    fn set_setting(&mut self, name: &str, value: Value) -> AppResult<()> {
        self.settings.insert(name.to_string(), value);
        Ok(())
    }

    fn set_settings(&mut self, entries: &[(&str, Value)]) -> AppResult<()> {
        self.settings
            .extend(entries.iter().map(|(name, value)| (name.to_string(), value.clone())));
        Ok(())
    }

    fn get_all_settings(&self) -> AppResult<Map<String, Value>> {
        Ok(self.settings.clone())
    }
}
