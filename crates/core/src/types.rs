use chrono::{DateTime, Utc};

/// Stable unique identifier assigned by the identity provider.
pub type Uid = String;

/// Opaque document id within the projects collection.
pub type ProjectId = String;

/// UTC timestamp used across all entities.
pub type Timestamp = DateTime<Utc>;
