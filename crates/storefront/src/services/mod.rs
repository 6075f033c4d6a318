//! Storefront state managers.
//!
//! Two independent leaves with no dependency on each other; the UI layer
//! composes them. Each owns its slice of state, persists it through a
//! [`crate::storage::StorageBackend`], and publishes changes over a watch
//! channel.

pub mod cart;
pub mod session;
