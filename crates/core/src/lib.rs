//! Tienda Core - Shared types library.
//!
//! This crate provides common types used across all Tienda components:
//! - `storefront` - Cart and session state managers plus the remote store client
//! - `integration-tests` - Cross-crate integration tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, and the lenient scalar wrappers
//!   that absorb the mock API's loosely typed JSON fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
