//! Membership resolver: contact email -> durable UID.

use std::sync::Arc;

use validator::ValidateEmail;

use planbase_core::types::Uid;
use planbase_core::CoreError;
use planbase_store::{DocumentStore, Predicate};

use crate::config::fields;
use crate::error::SyncResult;

/// Resolves a human-entered contact address to the identity provider's UID
/// via the user-record collection.
pub struct MembershipResolver {
    store: Arc<dyn DocumentStore>,
    users_collection: String,
}

impl MembershipResolver {
    pub fn new(store: Arc<dyn DocumentStore>, users_collection: impl Into<String>) -> Self {
        Self {
            store,
            users_collection: users_collection.into(),
        }
    }

    /// Exact-match lookup of a user record by email.
    ///
    /// The identity provider enforces email uniqueness, so more than one
    /// match is a data-integrity bug in the store; it is reported as a
    /// [`CoreError::Conflict`] rather than tie-broken silently.
    pub async fn resolve_by_email(&self, email: &str) -> SyncResult<Uid> {
        if !email.validate_email() {
            return Err(CoreError::Validation(format!("not a valid email address: {email}")).into());
        }

        let matches = self
            .store
            .query(
                &self.users_collection,
                Predicate::field_equals(fields::EMAIL, email),
            )
            .await?;

        match matches.as_slice() {
            [] => Err(CoreError::not_found("user", email).into()),
            [only] => Ok(only.id.clone()),
            many => Err(CoreError::Conflict(format!(
                "{} user records match email {email}; expected exactly one",
                many.len()
            ))
            .into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
