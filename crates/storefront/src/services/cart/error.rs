//! Cart error types.

use thiserror::Error;

/// Errors that can occur when mutating the cart.
///
/// Every failure is atomic: the cart is left exactly as it was. These are
/// user-visible warnings, not crashes, and nothing is retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The incoming product's stock field is not a non-negative integer.
    #[error("product \"{name}\" has invalid stock; it cannot be added to the cart")]
    InvalidStock {
        /// Product display name, for the user-facing warning.
        name: String,
    },

    /// The requested quantity exceeds the stock ceiling. The add is
    /// all-or-nothing; partial fulfillment is never performed.
    #[error(
        "only {available} units of \"{name}\" available; \
         {in_cart} already in the cart, cannot add {requested} more"
    )]
    InsufficientStock {
        /// Product display name.
        name: String,
        /// Stock ceiling at the time of the add.
        available: u32,
        /// Quantity already in the cart for this product.
        in_cart: u32,
        /// Quantity the caller tried to add.
        requested: u32,
    },
}
