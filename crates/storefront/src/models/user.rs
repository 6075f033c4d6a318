//! User record types for the remote users collection.
//!
//! These are wire types. The password field exists only on the remote record
//! and in the registration payload; it is compared during login and never
//! copied into session state or local storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tienda_core::{AdminFlag, UserId};

/// A user record as stored in the remote collection.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    /// Server-assigned record ID.
    pub id: UserId,
    /// First name.
    #[serde(rename = "nombre", default)]
    pub name: String,
    /// Last name.
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    /// Email address, compared verbatim during login.
    #[serde(default)]
    pub email: String,
    /// Stored plaintext password (mock authentication only).
    #[serde(default)]
    pub password: String,
    /// The admin checkbox in whatever shape the registration form stored it.
    #[serde(rename = "checkbox", default)]
    pub admin: AdminFlag,
    /// Server-assigned creation timestamp.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for registering a new user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// First name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Last name.
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Password, stored as-is by the mock store.
    pub password: String,
    /// Admin flag, serialized as the remote's `checkbox` field.
    #[serde(rename = "checkbox")]
    pub is_admin: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_deserializes_remote_shape() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": "2",
            "nombre": "Ana",
            "apellido": "García",
            "email": "ana@example.com",
            "password": "secreta",
            "checkbox": true
        }))
        .unwrap();

        assert_eq!(record.id.as_str(), "2");
        assert_eq!(record.email, "ana@example.com");
        assert!(record.admin.is_set());
    }

    #[test]
    fn test_user_record_missing_checkbox_is_not_admin() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": "5",
            "email": "x@x.com",
            "password": "pw"
        }))
        .unwrap();
        assert!(!record.admin.is_set());
    }

    #[test]
    fn test_new_user_serializes_checkbox() {
        let payload = NewUser {
            name: "Ana".to_owned(),
            last_name: "García".to_owned(),
            email: "ana@example.com".to_owned(),
            password: "secreta".to_owned(),
            is_admin: false,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["nombre"], "Ana");
        assert_eq!(value["apellido"], "García");
        assert_eq!(value["checkbox"], false);
    }
}
