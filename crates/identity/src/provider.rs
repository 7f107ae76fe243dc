//! The [`IdentityProvider`] trait and the authenticated-user handle.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::IdentityError;

/// Snapshot of the signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    /// Stable unique identifier, immutable for the account's lifetime.
    pub uid: String,
    /// `None` for providers that authenticate without an email address.
    pub email: Option<String>,
    pub email_verified: bool,
}

/// Contract of the external identity provider.
///
/// All session state lives with the provider; this layer never stores
/// credentials or tokens. Operations addressing "the current user" fail
/// with [`IdentityError::NoAuthenticatedUser`] when no session is active.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and sign it in.
    async fn create_account(&self, email: &str, password: &str)
        -> Result<AuthUser, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;

    /// Send a verification email to the current user.
    async fn send_email_verification(&self) -> Result<(), IdentityError>;

    /// Start an email change for the current user. The provider verifies
    /// the new address before the change takes effect.
    async fn request_email_update(&self, new_email: &str) -> Result<(), IdentityError>;

    /// Permanently delete the current user's identity and end the session.
    async fn delete_account(&self) -> Result<(), IdentityError>;

    /// The signed-in user, if any.
    async fn current_user(&self) -> Option<AuthUser>;

    /// The signed-in user, or [`IdentityError::NoAuthenticatedUser`].
    async fn require_current_user(&self) -> Result<AuthUser, IdentityError> {
        self.current_user()
            .await
            .ok_or(IdentityError::NoAuthenticatedUser)
    }
}
