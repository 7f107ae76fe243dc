//! Layer configuration.

/// Document field names used in predicates and array mutations.
pub mod fields {
    pub const OWNER: &str = "owner";
    pub const COLLABORATORS: &str = "collaborators";
    pub const EMAIL: &str = "email";
}

/// Collection names for the two document collections this layer touches.
///
/// All fields have defaults matching the production store layout; override
/// via environment variables when pointing at a shared or emulated store.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Collection holding project documents (default: `Projects`).
    pub projects_collection: String,
    /// Collection holding user records, keyed by UID (default: `Users`).
    pub users_collection: String,
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default    |
    /// |-----------------------|------------|
    /// | `PROJECTS_COLLECTION` | `Projects` |
    /// | `USERS_COLLECTION`    | `Users`    |
    pub fn from_env() -> Self {
        let projects_collection =
            std::env::var("PROJECTS_COLLECTION").unwrap_or_else(|_| "Projects".into());
        let users_collection = std::env::var("USERS_COLLECTION").unwrap_or_else(|_| "Users".into());
        Self {
            projects_collection,
            users_collection,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            projects_collection: "Projects".to_string(),
            users_collection: "Users".to_string(),
        }
    }
}
