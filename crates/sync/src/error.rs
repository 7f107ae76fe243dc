use planbase_core::CoreError;
use planbase_identity::IdentityError;
use planbase_store::StoreError;

/// Error surface of the consistency layer.
///
/// Domain failures (not-found, invariant violations, cache preconditions,
/// ambiguous email matches) travel as [`CoreError`]; anything raised by the
/// remote store or the identity provider is a remote operation failure and
/// is wrapped, never retried.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("remote store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("identity provider operation failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("entity serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias for public operation return values.
pub type SyncResult<T> = Result<T, SyncError>;
