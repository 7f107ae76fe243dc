//! In-memory reference backend.
//!
//! Implements the full [`DocumentStore`] contract over a `tokio` RwLock,
//! preserving per-collection insertion order for query results. Used by the
//! test suites and for local development without a hosted store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::document::{Document, Predicate};
use crate::error::StoreError;
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    fields: Value,
}

/// Collection name -> documents in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    fn require_object(fields: &Value) -> Result<(), StoreError> {
        if fields.is_object() {
            Ok(())
        } else {
            Err(StoreError::InvalidFields)
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|entries| entries.iter().find(|e| e.id == id))
            .map(|e| Document::new(e.id.clone(), e.fields.clone())))
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        Self::require_object(&fields)?;
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection.to_string()).or_default();
        match entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.fields = fields,
            None => entries.push(Entry {
                id: id.to_string(),
                fields,
            }),
        }
        tracing::debug!(collection, id, "document written");
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        Self::require_object(&fields)?;
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let target = entry
            .fields
            .as_object_mut()
            .ok_or(StoreError::InvalidFields)?;
        for (key, value) in fields.as_object().into_iter().flatten() {
            target.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(entries) = collections.get_mut(collection) {
            entries.retain(|e| e.id != id);
        }
        tracing::debug!(collection, id, "document deleted");
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        predicate: Predicate,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|e| predicate.matches(&e.fields))
            .map(|e| Document::new(e.id.clone(), e.fields.clone()))
            .collect())
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let target = entry
            .fields
            .as_object_mut()
            .ok_or(StoreError::InvalidFields)?;
        let items = target
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or(StoreError::InvalidFields)?;
        if !items.contains(&value) {
            items.push(value);
        }
        Ok(())
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        if let Some(items) = entry.fields.get_mut(field).and_then(Value::as_array_mut) {
            items.retain(|item| item != &value);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
