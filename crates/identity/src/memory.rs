//! In-memory reference provider.
//!
//! Holds accounts and the active session behind a `tokio` RwLock. Email
//! delivery is simulated: verification and email-change requests take
//! effect immediately instead of waiting for a link click.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::IdentityError;
use crate::provider::{AuthUser, IdentityProvider};

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password: String,
    email_verified: bool,
}

#[derive(Default)]
struct Inner {
    /// Keyed by UID.
    accounts: HashMap<String, Account>,
    /// UID of the signed-in user, if any.
    session: Option<String>,
}

#[derive(Default)]
pub struct MemoryIdentity {
    inner: RwLock<Inner>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account directly, bypassing the session (test setup).
    pub async fn seed_account(&self, uid: &str, email: &str, password: &str) {
        let mut inner = self.inner.write().await;
        inner.accounts.insert(
            uid.to_string(),
            Account {
                uid: uid.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                email_verified: true,
            },
        );
    }

    /// Open a session for a seeded account (test setup).
    pub async fn sign_in_as(&self, uid: &str) {
        let mut inner = self.inner.write().await;
        debug_assert!(inner.accounts.contains_key(uid));
        inner.session = Some(uid.to_string());
    }

    pub async fn account_exists(&self, uid: &str) -> bool {
        self.inner.read().await.accounts.contains_key(uid)
    }

    fn to_auth_user(account: &Account) -> AuthUser {
        AuthUser {
            uid: account.uid.clone(),
            email: Some(account.email.clone()),
            email_verified: account.email_verified,
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, IdentityError> {
        let mut inner = self.inner.write().await;
        if inner.accounts.values().any(|a| a.email == email) {
            return Err(IdentityError::EmailAlreadyRegistered(email.to_string()));
        }
        let account = Account {
            uid: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            email_verified: false,
        };
        let user = Self::to_auth_user(&account);
        inner.session = Some(account.uid.clone());
        inner.accounts.insert(account.uid.clone(), account);
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, IdentityError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .values()
            .find(|a| a.email == email)
            .ok_or(IdentityError::InvalidCredentials)?;
        if account.password != password {
            return Err(IdentityError::InvalidCredentials);
        }
        let user = Self::to_auth_user(account);
        inner.session = Some(user.uid.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.inner.write().await.session = None;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let inner = self.inner.read().await;
        if !inner.accounts.values().any(|a| a.email == email) {
            return Err(IdentityError::AccountNotFound(email.to_string()));
        }
        tracing::debug!(email, "password reset email simulated");
        Ok(())
    }

    async fn send_email_verification(&self) -> Result<(), IdentityError> {
        let mut inner = self.inner.write().await;
        let uid = inner
            .session
            .clone()
            .ok_or(IdentityError::NoAuthenticatedUser)?;
        let account = inner
            .accounts
            .get_mut(&uid)
            .ok_or(IdentityError::NoAuthenticatedUser)?;
        if account.email_verified {
            return Err(IdentityError::EmailAlreadyVerified);
        }
        account.email_verified = true;
        Ok(())
    }

    async fn request_email_update(&self, new_email: &str) -> Result<(), IdentityError> {
        let mut inner = self.inner.write().await;
        let uid = inner
            .session
            .clone()
            .ok_or(IdentityError::NoAuthenticatedUser)?;
        if inner.accounts.values().any(|a| a.email == new_email) {
            return Err(IdentityError::EmailAlreadyRegistered(new_email.to_string()));
        }
        let account = inner
            .accounts
            .get_mut(&uid)
            .ok_or(IdentityError::NoAuthenticatedUser)?;
        account.email = new_email.to_string();
        Ok(())
    }

    async fn delete_account(&self) -> Result<(), IdentityError> {
        let mut inner = self.inner.write().await;
        let uid = inner
            .session
            .take()
            .ok_or(IdentityError::NoAuthenticatedUser)?;
        inner.accounts.remove(&uid);
        Ok(())
    }

    async fn current_user(&self) -> Option<AuthUser> {
        let inner = self.inner.read().await;
        let uid = inner.session.as_ref()?;
        inner.accounts.get(uid).map(Self::to_auth_user)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
