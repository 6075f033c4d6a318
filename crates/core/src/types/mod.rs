//! Core type definitions.
//!
//! Newtype wrappers and lenient scalars shared across the workspace.

mod email;
mod id;
mod scalar;

pub use email::{Email, EmailError};
pub use id::{ProductId, UserId};
pub use scalar::{AdminFlag, PriceValue, StockValue};
