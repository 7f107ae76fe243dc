//! Account lifecycle service and the account-deletion saga.
//!
//! The store offers no cross-collection transaction, so removing an
//! account's footprint is a saga: an ordered list of independent steps,
//! each reported individually, with no automatic compensation. Every step
//! is attempted even when an earlier one failed — maximal cleanup is
//! preferred over fail-fast.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use validator::ValidateEmail;

use planbase_core::types::Uid;
use planbase_core::{CoreError, UserProfile, UserRecord};
use planbase_events::{DomainEvent, EventBus};
use planbase_identity::{AuthUser, IdentityProvider};
use planbase_store::{DocumentStore, Predicate};

use crate::config::{fields, SyncConfig};
use crate::error::SyncResult;

// ---------------------------------------------------------------------------
// Deletion saga reporting
// ---------------------------------------------------------------------------

/// The ordered steps of the account-deletion saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionStep {
    /// Delete every project document owned by the user.
    DeleteOwnedProjects,
    /// Remove the user's UID from every project that lists them as a
    /// collaborator.
    DetachCollaborations,
    /// Delete the user's own record from the user-record collection.
    DeleteUserRecord,
    /// Delete the external identity and end the session.
    DeleteIdentity,
}

impl DeletionStep {
    pub fn name(&self) -> &'static str {
        match self {
            DeletionStep::DeleteOwnedProjects => "delete_owned_projects",
            DeletionStep::DetachCollaborations => "detach_collaborations",
            DeletionStep::DeleteUserRecord => "delete_user_record",
            DeletionStep::DeleteIdentity => "delete_identity",
        }
    }
}

/// Outcome of one saga step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: DeletionStep,
    /// Documents (or identities) successfully affected by this step.
    pub affected: usize,
    /// The step's last error, if any part of it failed.
    pub error: Option<String>,
}

impl StepReport {
    fn ok(step: DeletionStep, affected: usize) -> Self {
        Self {
            step,
            affected,
            error: None,
        }
    }

    fn failed(step: DeletionStep, affected: usize, error: impl ToString) -> Self {
        Self {
            step,
            affected,
            error: Some(error.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Structured result of the deletion saga: which steps completed, which
/// failed, and with what. Lets callers determine exactly how far the
/// cascade got.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionReport {
    /// UID of the deleted (or partially deleted) account.
    pub uid: Uid,
    pub steps: Vec<StepReport>,
}

impl DeletionReport {
    /// `true` if every step succeeded.
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(StepReport::succeeded)
    }

    /// The last step error encountered, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.steps
            .iter()
            .rev()
            .find_map(|s| s.error.as_deref())
    }
}

// ---------------------------------------------------------------------------
// AccountService
// ---------------------------------------------------------------------------

/// Account lifecycle operations: registration, session management, profile
/// upkeep, and cascading account deletion.
pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    bus: Arc<EventBus>,
    config: SyncConfig,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        bus: Arc<EventBus>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            identity,
            bus,
            config,
        }
    }

    /// Register a new account: create the identity, send the verification
    /// email, and persist the user record keyed by the new UID.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: UserProfile,
    ) -> SyncResult<AuthUser> {
        if !email.validate_email() {
            return Err(CoreError::Validation(format!("not a valid email address: {email}")).into());
        }

        let user = self.identity.create_account(email, password).await?;
        self.identity.send_email_verification().await?;

        let record = UserRecord::new(user.email.clone(), profile, Utc::now());
        self.store
            .set(
                &self.config.users_collection,
                &user.uid,
                serde_json::to_value(&record)?,
            )
            .await?;

        tracing::info!(uid = %user.uid, "account registered");
        self.bus.publish(DomainEvent::UserSignedUp {
            uid: user.uid.clone(),
        });
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> SyncResult<AuthUser> {
        let user = self.identity.sign_in(email, password).await?;
        self.bus.publish(DomainEvent::UserSignedIn {
            uid: user.uid.clone(),
        });
        Ok(user)
    }

    pub async fn sign_out(&self) -> SyncResult<()> {
        self.identity.sign_out().await?;
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> SyncResult<()> {
        self.identity.send_password_reset(email).await?;
        Ok(())
    }

    /// Re-send the verification email for the current user.
    pub async fn resend_verification(&self) -> SyncResult<()> {
        self.identity.send_email_verification().await?;
        Ok(())
    }

    /// Start a verified email change with the identity provider. The user
    /// record is synchronized separately via [`sync_email`](Self::sync_email)
    /// once the provider reports the new address.
    pub async fn request_email_update(&self, new_email: &str) -> SyncResult<()> {
        if !new_email.validate_email() {
            return Err(
                CoreError::Validation(format!("not a valid email address: {new_email}")).into(),
            );
        }
        self.identity.request_email_update(new_email).await?;
        Ok(())
    }

    /// Copy the provider's current email onto the user record.
    pub async fn sync_email(&self) -> SyncResult<()> {
        let user = self.identity.require_current_user().await?;
        self.store
            .update(
                &self.config.users_collection,
                &user.uid,
                json!({ (fields::EMAIL): user.email }),
            )
            .await?;
        Ok(())
    }

    /// Update the current user's profile fields on the user record.
    pub async fn update_profile(&self, profile: UserProfile) -> SyncResult<()> {
        let user = self.identity.require_current_user().await?;
        self.store
            .update(
                &self.config.users_collection,
                &user.uid,
                serde_json::to_value(&profile)?,
            )
            .await?;
        Ok(())
    }

    /// Remove the current user's ownership and membership footprint, then
    /// the user record, then the identity.
    ///
    /// Fails fatally only when no user is signed in. Otherwise all four
    /// steps run in order, each step's concurrent batch settles before the
    /// next begins, and per-step failures are recorded in the returned
    /// [`DeletionReport`] instead of aborting the cascade. Nothing is
    /// rolled back.
    pub async fn delete_account(&self) -> SyncResult<DeletionReport> {
        let user = self.identity.require_current_user().await?;
        let uid = user.uid;
        tracing::info!(uid = %uid, "account deletion started");

        let mut report = DeletionReport {
            uid: uid.clone(),
            steps: Vec::with_capacity(4),
        };

        report.steps.push(self.delete_owned_projects(&uid).await);
        report.steps.push(self.detach_collaborations(&uid).await);
        report.steps.push(self.delete_user_record(&uid).await);
        report.steps.push(self.delete_identity().await);

        for step in &report.steps {
            if let Some(error) = &step.error {
                tracing::warn!(uid = %uid, step = step.step.name(), error, "deletion step failed");
            }
        }
        if report.is_complete() {
            tracing::info!(uid = %uid, "account deletion completed");
            self.bus.publish(DomainEvent::AccountDeleted { uid });
        }
        Ok(report)
    }

    /// Saga step 1: delete every project owned by `uid`, all deletions
    /// issued concurrently.
    async fn delete_owned_projects(&self, uid: &str) -> StepReport {
        let step = DeletionStep::DeleteOwnedProjects;
        let projects = &self.config.projects_collection;

        let docs = match self
            .store
            .query(projects, Predicate::field_equals(fields::OWNER, uid))
            .await
        {
            Ok(docs) => docs,
            Err(err) => return StepReport::failed(step, 0, err),
        };

        let deletions = docs.iter().map(|doc| self.store.delete(projects, &doc.id));
        settle_batch(step, futures::future::join_all(deletions).await)
    }

    /// Saga step 2: set-difference `uid` out of the collaborator array of
    /// every project that contains it, all updates issued concurrently.
    async fn detach_collaborations(&self, uid: &str) -> StepReport {
        let step = DeletionStep::DetachCollaborations;
        let projects = &self.config.projects_collection;

        let docs = match self
            .store
            .query(
                projects,
                Predicate::array_contains(fields::COLLABORATORS, uid),
            )
            .await
        {
            Ok(docs) => docs,
            Err(err) => return StepReport::failed(step, 0, err),
        };

        let removals = docs.iter().map(|doc| {
            self.store
                .array_remove(projects, &doc.id, fields::COLLABORATORS, json!(uid))
        });
        settle_batch(step, futures::future::join_all(removals).await)
    }

    /// Saga step 3: delete the user record document.
    async fn delete_user_record(&self, uid: &str) -> StepReport {
        let step = DeletionStep::DeleteUserRecord;
        match self.store.delete(&self.config.users_collection, uid).await {
            Ok(()) => StepReport::ok(step, 1),
            Err(err) => StepReport::failed(step, 0, err),
        }
    }

    /// Saga step 4: delete the external identity.
    async fn delete_identity(&self) -> StepReport {
        let step = DeletionStep::DeleteIdentity;
        match self.identity.delete_account().await {
            Ok(()) => StepReport::ok(step, 1),
            Err(err) => StepReport::failed(step, 0, err),
        }
    }
}

/// Collapse a settled concurrent batch into a step report: count successes,
/// keep the last error.
fn settle_batch<E: ToString>(step: DeletionStep, results: Vec<Result<(), E>>) -> StepReport {
    let mut affected = 0;
    let mut error = None;
    for result in results {
        match result {
            Ok(()) => affected += 1,
            Err(err) => error = Some(err.to_string()),
        }
    }
    StepReport {
        step,
        affected,
        error,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
