//! External identity provider contract.
//!
//! Authentication itself (credential storage, token issuance, email
//! delivery) is the provider's business; this crate only defines the
//! surface the consistency layer consumes: account lifecycle operations and
//! the nullable current-user handle. [`MemoryIdentity`] is the reference
//! provider used by tests.

pub mod error;
pub mod memory;
pub mod provider;

pub use error::IdentityError;
pub use memory::MemoryIdentity;
pub use provider::{AuthUser, IdentityProvider};
