#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The target document does not exist (partial updates and array
    /// mutations require an existing document; `delete` does not).
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A field map passed to `set`/`update` was not a JSON object.
    #[error("field map must be a JSON object")]
    InvalidFields,

    /// A document's fields could not be decoded into the requested type.
    #[error("document decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The underlying backend failed (network, permission, quota).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}
