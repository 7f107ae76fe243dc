//! Project entity model and DTOs.
//!
//! A project document lives in the remote `Projects` collection; the
//! document id doubles as the entity id and is never serialized into the
//! field map. Field names follow the store's camelCase schema.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{ProjectId, Timestamp, Uid};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Lifecycle status of a project.
///
/// Serialized as the exact strings `"Pending"` / `"Active"` / `"Finished"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Pending,
    Active,
    Finished,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Role context of the project creator (not per-collaborator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Architect,
    Engineer,
    Developer,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A collaborative work item.
///
/// Invariants enforced by the sync layer before every mutating write:
/// - `owner` never appears in `collaborators`.
/// - `collaborators` contains no duplicate UID.
/// - `id` is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Document id. Carried out-of-band as the document key, never in the
    /// serialized field map.
    #[serde(skip)]
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub user_role: UserRole,
    pub finish_date: Timestamp,
    /// UID of the user that created the project. Never changed by this layer.
    pub owner: Uid,
    /// UIDs of users granted access without ownership rights.
    #[serde(default)]
    pub collaborators: Vec<Uid>,
    pub created_at: Timestamp,
    /// Free-text activity entries, append-only by convention.
    #[serde(default)]
    pub activity_logs: Vec<String>,
}

impl Project {
    /// Construct a freshly created project: the given owner, no
    /// collaborators, no activity logs.
    pub fn new(data: NewProject, owner: Uid, id: ProjectId) -> Self {
        Self {
            id,
            name: data.name,
            description: data.description,
            status: data.status,
            user_role: data.user_role,
            finish_date: data.finish_date,
            owner,
            collaborators: Vec::new(),
            created_at: data.created_at,
            activity_logs: Vec::new(),
        }
    }

    /// Whether the project is visible to `uid` (owner or collaborator).
    pub fn is_visible_to(&self, uid: &str) -> bool {
        self.owner == uid || self.collaborators.iter().any(|c| c == uid)
    }

    /// Gate for adding `uid` as a collaborator.
    ///
    /// Rejects the owner (invariant 1) and existing collaborators
    /// (invariant 2). Must be called against freshly read remote state, not
    /// a cached copy.
    pub fn ensure_can_add_collaborator(&self, uid: &str) -> Result<(), CoreError> {
        if self.owner == uid {
            return Err(CoreError::InvariantViolation(
                "the owner cannot be added as a collaborator".into(),
            ));
        }
        if self.collaborators.iter().any(|c| c == uid) {
            return Err(CoreError::InvariantViolation(format!(
                "user {uid} is already a collaborator"
            )));
        }
        Ok(())
    }

    /// Gate for removing `uid` from the collaborator set.
    pub fn ensure_collaborator_present(&self, uid: &str) -> Result<(), CoreError> {
        if !self.collaborators.iter().any(|c| c == uid) {
            return Err(CoreError::InvariantViolation(format!(
                "user {uid} is not a collaborator of this project"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Caller-supplied subset for project creation. Owner, collaborators, and
/// activity logs are defaulted by [`Project::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub user_role: UserRole,
    pub finish_date: Timestamp,
    pub created_at: Timestamp,
}

/// Partial update for a project. Only non-`None` fields are written
/// remotely; omitted fields are left untouched.
///
/// Ownership and collaborator membership are deliberately absent: the owner
/// is immutable and membership changes go through the dedicated
/// add/remove-collaborator operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_logs: Option<Vec<String>>,
}

impl ProjectUpdate {
    /// `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.user_role.is_none()
            && self.finish_date.is_none()
            && self.activity_logs.is_none()
    }

    /// Merge the set fields over an existing project (cache reconstruction
    /// after a successful remote partial update).
    pub fn merge_into(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(user_role) = self.user_role {
            project.user_role = user_role;
        }
        if let Some(finish_date) = self.finish_date {
            project.finish_date = finish_date;
        }
        if let Some(activity_logs) = &self.activity_logs {
            project.activity_logs = activity_logs.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
