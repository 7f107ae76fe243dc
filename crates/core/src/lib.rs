//! Planbase core domain model.
//!
//! Entity types, shared aliases, the domain error taxonomy, and the
//! membership invariant gates. This crate has zero internal dependencies so
//! that the store, identity, and sync layers can all reference the same
//! vocabulary.

pub mod error;
pub mod project;
pub mod types;
pub mod user;

pub use error::CoreError;
pub use project::{NewProject, Project, ProjectStatus, ProjectUpdate, UserRole};
pub use user::{DisplayName, UserProfile, UserRecord};
