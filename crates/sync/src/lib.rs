//! Project & membership consistency layer.
//!
//! The remote store is the single source of truth; this crate keeps an
//! in-process view of it consistent with committed remote state:
//!
//! - [`ProjectsManager`] — authoritative in-process list of the projects
//!   visible to the active user; mediates every read/write against the
//!   store and updates its cache only after remote acknowledgement.
//! - [`MembershipResolver`] — translates a contact email into a UID and
//!   gates the membership invariants against freshly read remote state.
//! - [`AccountService`] — account lifecycle glue plus the cascading
//!   account-deletion saga across collections.
//!
//! No operation retries, rolls back, or serializes concurrent callers;
//! failures surface immediately and callers needing mutual exclusion on a
//! manager serialize externally (the `&mut self` receivers enforce this
//! within one process).

pub mod account;
pub mod config;
pub mod error;
pub mod manager;
pub mod resolver;

pub use account::{AccountService, DeletionReport, DeletionStep, StepReport};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use manager::ProjectsManager;
pub use resolver::MembershipResolver;
