//! Remote document store contract.
//!
//! The projects layer talks to a schema-less, collection/document-keyed
//! persistence service with per-document CRUD, simple predicate queries,
//! and idempotent server-side array mutations — and nothing more. No
//! cross-document transaction primitive is relied upon anywhere.
//!
//! [`DocumentStore`] captures exactly that contract. [`MemoryStore`] is the
//! reference backend used by tests and local development; production
//! deployments plug in a client for their hosted store behind the same
//! trait.

pub mod document;
pub mod error;
pub mod memory;
pub mod store;

pub use document::{Document, Predicate};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::DocumentStore;
