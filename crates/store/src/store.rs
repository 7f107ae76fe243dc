//! The [`DocumentStore`] trait — everything the consistency layer is
//! allowed to assume about the remote store.

use async_trait::async_trait;
use serde_json::Value;

use crate::document::{Document, Predicate};
use crate::error::StoreError;

/// Contract of the remote document store.
///
/// Atomicity is at-most per document: `set`, `update`, `delete`,
/// `array_union`, and `array_remove` each apply atomically to one document,
/// and nothing coordinates across documents or collections. Callers that
/// need a cross-document guarantee must design for its absence (see the
/// account deletion saga).
///
/// Query results come back in the backend's stable insertion order; the
/// contract guarantees no other ordering.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read. `Ok(None)` when the document does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Full overwrite, create-or-replace. `fields` must be a JSON object.
    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Partial update with merge semantics: listed fields are replaced,
    /// everything else is left intact. Fails with [`StoreError::NotFound`]
    /// if the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Delete a document. Idempotent: deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Predicate query returning matching documents in insertion order.
    async fn query(
        &self,
        collection: &str,
        predicate: Predicate,
    ) -> Result<Vec<Document>, StoreError>;

    /// Server-side idempotent set-union append on an array field. A missing
    /// field is treated as an empty array; adding an element that is
    /// already present is a no-op.
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError>;

    /// Server-side idempotent set-difference removal on an array field.
    /// Removing an absent element is a no-op.
    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError>;

    /// Mint a fresh document id without writing anything.
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
