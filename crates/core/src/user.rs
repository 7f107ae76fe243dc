//! User record model and display lookups.
//!
//! User documents are written by registration and consumed here only to
//! resolve collaborator identity (email -> UID) and display names. The
//! document id is the identity provider's UID.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Role assigned to every newly registered user.
pub const DEFAULT_USER_ROLE: &str = "basic";

/// Placeholder shown when a user record carries no name.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// Document stored in the user-record collection, keyed by UID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Email as reported by the identity provider; `None` for providers
    /// that do not expose one.
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    pub created_at: Timestamp,
}

fn default_role() -> String {
    DEFAULT_USER_ROLE.to_string()
}

impl UserRecord {
    /// Build the record persisted at registration time.
    pub fn new(email: Option<String>, profile: UserProfile, created_at: Timestamp) -> Self {
        Self {
            email,
            name: Some(profile.name),
            last_name: Some(profile.last_name),
            company: Some(profile.company),
            job_title: Some(profile.job_title),
            country: Some(profile.country),
            role: default_role(),
            created_at,
        }
    }

    /// Display fields for this record, with placeholder defaults.
    pub fn display_name(&self) -> DisplayName {
        DisplayName {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string()),
            last_name: self.last_name.clone().unwrap_or_default(),
        }
    }
}

/// Profile fields collected at registration and editable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub last_name: String,
    pub company: String,
    pub job_title: String,
    pub country: String,
}

/// Name pair returned by collaborator display lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayName {
    pub name: String,
    pub last_name: String,
}
