//! Session-scoped key/value persistence for canvas state.
//!
//! The store stands in for browser session storage: values survive a reload
//! of the same session, not across sessions. It is injected into the registry
//! so tests can construct state from a fresh fake.
pub mod file;
pub mod memory;

use crate::errors::StoreResult;

/// Key/value store scoped to a user session.
///
/// Failures are expected to degrade upstream to an unpersisted (or empty)
/// state rather than block rendering.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}
