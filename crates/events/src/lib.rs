//! Planbase event bus.
//!
//! In-process publish/subscribe hub for domain lifecycle notifications:
//!
//! - [`EventBus`] — fan-out hub backed by `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical event vocabulary (project and account
//!   lifecycle).
//!
//! Downstream consumers (analytics, UI refresh) subscribe here instead of
//! being wired in as callbacks; publishers fire only after the
//! corresponding remote write has been acknowledged.

pub mod bus;

pub use bus::{DomainEvent, EventBus, EventEnvelope};
