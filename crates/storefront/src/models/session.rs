//! Session-related types.
//!
//! Types persisted to and restored from the local session slot.

use serde::{Deserialize, Serialize};

use tienda_core::{AdminFlag, Email, UserId};

/// The current authenticated user.
///
/// `is_admin` is derived from the raw admin flag exactly once per lifecycle
/// boundary - at login from the remote record, at restore from the persisted
/// snapshot - so no other call site re-interprets the raw flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User's remote record ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Whether the user may reach the admin screens.
    pub is_admin: bool,
}

/// Persisted session snapshot.
///
/// Keeps the admin flag in its raw remote shape so restore can re-derive
/// `is_admin` even when the snapshot was written by an older build with a
/// different idea of the flag's type. The password is never part of this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    /// User's remote record ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Raw admin flag, re-coerced on every restore.
    #[serde(rename = "checkbox", default)]
    pub admin: AdminFlag,
}

impl StoredUser {
    /// Normalize the snapshot into the domain type. Load-boundary only.
    #[must_use]
    pub fn into_current(self) -> CurrentUser {
        let is_admin = self.admin.is_set();
        CurrentUser {
            id: self.id,
            email: self.email,
            is_admin,
        }
    }
}

/// Local storage slot keys.
pub mod keys {
    /// Slot holding the persisted session snapshot.
    pub const SESSION: &str = "usuario";

    /// Slot holding the persisted cart lines.
    pub const CART: &str = "cartItems";
}
