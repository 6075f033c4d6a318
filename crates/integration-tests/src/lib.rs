//! Shared fixtures for Tienda integration tests.
//!
//! Provides [`InMemoryRemote`], a `RemoteStore` implementation over plain
//! vectors, so the managers can be exercised end-to-end without a network.

// Test support code; panicking on poisoned fixture state is fine here.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;

use tienda_core::ProductId;
use tienda_storefront::models::{NewProduct, NewUser, Product, UserRecord};
use tienda_storefront::remote::{RemoteError, RemoteStore};

/// In-memory remote store with the mock API's record shapes.
#[derive(Default)]
pub struct InMemoryRemote {
    products: Mutex<Vec<Product>>,
    users: Mutex<Vec<UserRecord>>,
    next_id: AtomicU64,
}

impl InMemoryRemote {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn assign_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    /// Seed a product record the way the mock store would hold it
    /// (price and stock as strings).
    pub fn seed_product(&self, name: &str, price: &str, stock: i64) -> Product {
        let product: Product = serde_json::from_value(json!({
            "id": self.assign_id(),
            "nombre": name,
            "precio": price,
            "stock": stock.to_string(),
        }))
        .unwrap();
        self.products.lock().unwrap().push(product.clone());
        product
    }

    /// Seed a user record.
    pub fn seed_user(&self, email: &str, password: &str, admin: bool) -> UserRecord {
        let user: UserRecord = serde_json::from_value(json!({
            "id": self.assign_id(),
            "nombre": "Test",
            "apellido": "User",
            "email": email,
            "password": password,
            "checkbox": admin,
        }))
        .unwrap();
        self.users.lock().unwrap().push(user.clone());
        user
    }

    /// Snapshot of the seeded/created product records.
    #[must_use]
    pub fn product_records(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    /// Snapshot of the seeded/created user records.
    #[must_use]
    pub fn user_records(&self) -> Vec<UserRecord> {
        self.users.lock().unwrap().clone()
    }
}

impl RemoteStore for InMemoryRemote {
    async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, RemoteError> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("product {id}")))
    }

    async fn create_product(&self, payload: &NewProduct) -> Result<Product, RemoteError> {
        let mut value = serde_json::to_value(payload).unwrap();
        value["id"] = json!(self.assign_id());
        let product: Product = serde_json::from_value(value).unwrap();
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        payload: &NewProduct,
    ) -> Result<Product, RemoteError> {
        let mut value = serde_json::to_value(payload).unwrap();
        value["id"] = json!(id.as_str());
        let updated: Product = serde_json::from_value(value).unwrap();

        let mut products = self.products.lock().unwrap();
        let slot = products
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| RemoteError::NotFound(format!("product {id}")))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RemoteError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != *id);
        if products.len() == before {
            return Err(RemoteError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, payload: &NewUser) -> Result<UserRecord, RemoteError> {
        let mut value = serde_json::to_value(payload).unwrap();
        value["id"] = json!(self.assign_id());
        let user: UserRecord = serde_json::from_value(value).unwrap();
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }
}
