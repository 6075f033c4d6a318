//! Authentication error types.

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors that can occur during authentication operations.
///
/// Reported to the caller once per operation; the caller decides whether to
/// retry.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] tienda_core::EmailError),

    /// No user record with this email.
    #[error("user not found")]
    NotFound,

    /// The password does not match the stored value.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A required registration field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Remote store operation failed.
    #[error("remote store error: {0}")]
    Remote(#[from] RemoteError),
}
