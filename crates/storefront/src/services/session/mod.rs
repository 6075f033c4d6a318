//! Session manager.
//!
//! Owns the current authenticated user (or absence thereof), persists it to
//! the session slot, and restores it at startup. Authentication is mock:
//! the remote users collection stores plaintext passwords and login compares
//! them verbatim. The password is never copied into session state or local
//! storage.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use tienda_core::Email;

use crate::models::storage_keys;
use crate::models::{CurrentUser, NewUser, StoredUser};
use crate::remote::RemoteStore;
use crate::storage::StorageBackend;

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// The current user, if a session is active.
    pub user: Option<CurrentUser>,
    /// True only until the initial restore attempt completes.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Session manager.
///
/// Construct once at startup, call [`SessionManager::restore`] to rehydrate
/// any persisted session, then inject into the UI layer. Observers subscribe
/// via [`SessionManager::subscribe`] instead of reading ambient globals.
pub struct SessionManager<R> {
    remote: R,
    storage: Arc<dyn StorageBackend>,
    state: watch::Sender<SessionState>,
}

impl<R: RemoteStore> SessionManager<R> {
    /// Create a manager with no active session and `loading` set.
    #[must_use]
    pub fn new(remote: R, storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            remote,
            storage,
            state: watch::Sender::new(SessionState::default()),
        }
    }

    /// Restore the persisted session, if any. Invoked once at startup.
    ///
    /// Never fails: an absent slot yields an empty session, and a corrupt
    /// snapshot is discarded (with a warning) rather than surfaced. The
    /// admin flag is re-derived from the raw persisted value here, at the
    /// load boundary, to tolerate stale persisted shapes.
    pub fn restore(&self) {
        let user = self.storage.read(storage_keys::SESSION).and_then(|raw| {
            match serde_json::from_str::<StoredUser>(&raw) {
                Ok(stored) => Some(stored.into_current()),
                Err(e) => {
                    warn!(error = %e, "discarding corrupt session snapshot");
                    self.storage.remove(storage_keys::SESSION);
                    None
                }
            }
        });

        self.state.send_replace(SessionState {
            user,
            loading: false,
        });
    }

    /// Log in with email and password.
    ///
    /// Looks the user up by email in the remote store and compares the
    /// stored password. On success the user becomes current (overwriting any
    /// previous session) and is persisted for restoration across reloads.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed,
    /// `AuthError::NotFound` if no record matches it,
    /// `AuthError::InvalidCredentials` if the password differs, and
    /// `AuthError::Remote` if the users collection cannot be fetched.
    /// The session is left unset on every failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?;

        let users = self.remote.list_users().await?;
        let record = users
            .into_iter()
            .find(|u| u.email == email.as_str())
            .ok_or(AuthError::NotFound)?;

        if record.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let user = CurrentUser {
            id: record.id.clone(),
            email,
            is_admin: record.admin.is_set(),
        };

        self.persist(&StoredUser {
            id: record.id,
            email: user.email.clone(),
            admin: record.admin,
        });
        self.state.send_modify(|s| s.user = Some(user.clone()));

        info!(user = %user.id, admin = user.is_admin, "login succeeded");
        Ok(user)
    }

    /// Register a new user and log in with the same credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a required field is empty,
    /// `AuthError::InvalidEmail` for a malformed email, and the usual login
    /// errors if the follow-up login fails.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: NewUser) -> Result<CurrentUser, AuthError> {
        if payload.name.trim().is_empty() {
            return Err(AuthError::MissingField("first name"));
        }
        if payload.last_name.trim().is_empty() {
            return Err(AuthError::MissingField("last name"));
        }
        if payload.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        Email::parse(&payload.email)?;

        self.remote.create_user(&payload).await?;
        info!("registration succeeded");

        self.login(&payload.email, &payload.password).await
    }

    /// Clear the current user and the persisted snapshot.
    ///
    /// Idempotent - logging out with no active session is a no-op.
    pub fn logout(&self) {
        self.storage.remove(storage_keys::SESSION);
        self.state.send_if_modified(|s| {
            let had_user = s.user.take().is_some();
            if had_user {
                info!("logged out");
            }
            had_user
        });
    }

    /// The current user, if a session is active.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.borrow().user.clone()
    }

    /// True only until the initial restore attempt completes.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Subscribe to session state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Best-effort write of the session snapshot.
    fn persist(&self, stored: &StoredUser) {
        match serde_json::to_string(stored) {
            Ok(json) => {
                if let Err(e) = self.storage.write(storage_keys::SESSION, &json) {
                    warn!(error = %e, "failed to persist session snapshot");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize session snapshot"),
        }
    }
}
