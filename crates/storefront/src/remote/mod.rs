//! Remote mock REST store client.
//!
//! The remote store is a generic key-value CRUD collaborator: two JSON
//! collections (products and users) with list, get-by-id, create, update,
//! and delete. The [`RemoteStore`] trait is the seam the managers depend on;
//! [`MockApiClient`] is the `reqwest` implementation, with `moka`-cached
//! product reads and a sequence gate that discards stale list responses.

mod client;
mod seq;

pub use client::MockApiClient;
pub use seq::SequenceGate;

use thiserror::Error;

use tienda_core::ProductId;

use crate::models::{NewProduct, NewUser, Product, UserRecord};

/// Errors from remote store operations.
///
/// Surfaced to the caller once per operation; nothing here is retried
/// automatically.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed or returned an error status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Collection URL could not be built from the configuration.
    #[error("invalid collection URL: {0}")]
    Url(#[from] url::ParseError),

    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A newer request for the same collection was issued while this one was
    /// in flight; the response is discarded instead of delivered out of order.
    #[error("response superseded by a newer request")]
    Superseded,
}

/// CRUD access to the remote product and user collections.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// List all products.
    async fn list_products(&self) -> Result<Vec<Product>, RemoteError>;

    /// Get one product by ID.
    async fn get_product(&self, id: &ProductId) -> Result<Product, RemoteError>;

    /// Create a product.
    async fn create_product(&self, payload: &NewProduct) -> Result<Product, RemoteError>;

    /// Update a product.
    async fn update_product(
        &self,
        id: &ProductId,
        payload: &NewProduct,
    ) -> Result<Product, RemoteError>;

    /// Delete a product.
    async fn delete_product(&self, id: &ProductId) -> Result<(), RemoteError>;

    /// List all user records.
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError>;

    /// Create a user record.
    async fn create_user(&self, payload: &NewUser) -> Result<UserRecord, RemoteError>;
}

// Managers own their store; an Arc impl lets callers share one instance
// between a manager and other consumers (the admin screens, test fixtures).
impl<T: RemoteStore> RemoteStore for std::sync::Arc<T> {
    async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        (**self).list_products().await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, RemoteError> {
        (**self).get_product(id).await
    }

    async fn create_product(&self, payload: &NewProduct) -> Result<Product, RemoteError> {
        (**self).create_product(payload).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        payload: &NewProduct,
    ) -> Result<Product, RemoteError> {
        (**self).update_product(id, payload).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RemoteError> {
        (**self).delete_product(id).await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        (**self).list_users().await
    }

    async fn create_user(&self, payload: &NewUser) -> Result<UserRecord, RemoteError> {
        (**self).create_user(payload).await
    }
}
