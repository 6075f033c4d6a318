//! `reqwest` implementation of the remote store.
//!
//! Product reads are cached with `moka` (5-minute TTL) and invalidated on
//! every product mutation. User reads are never cached - login must see the
//! freshest credentials the store has.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use tracing::{debug, instrument};
use url::Url;

use tienda_core::ProductId;

use crate::config::MockApiConfig;
use crate::models::{NewProduct, NewUser, Product, UserRecord};

use super::seq::SequenceGate;
use super::{RemoteError, RemoteStore};

/// Cache key for product reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Product(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
}

/// Client for the remote mock REST store.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct MockApiClient {
    inner: Arc<MockApiClientInner>,
}

struct MockApiClientInner {
    client: reqwest::Client,
    products_url: Url,
    users_url: Url,
    cache: Cache<CacheKey, CacheValue>,
    products_gate: SequenceGate,
    users_gate: SequenceGate,
}

impl MockApiClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if a collection path does not resolve
    /// against the base URL.
    pub fn new(config: &MockApiConfig) -> Result<Self, url::ParseError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(MockApiClientInner {
                client: reqwest::Client::new(),
                products_url: config.collection_url(&config.products_path)?,
                users_url: config.collection_url(&config.users_path)?,
                cache,
                products_gate: SequenceGate::new(),
                users_gate: SequenceGate::new(),
            }),
        })
    }

    /// Drop all cached product reads.
    async fn invalidate_products(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Append a record ID to a collection URL.
fn item_url(collection: &Url, id: &str) -> Url {
    let mut url = collection.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id);
    }
    url
}

/// Run a fetch under a sequence-gate ticket.
///
/// If a newer ticket was issued for the same gate while the fetch was in
/// flight, the completed response is discarded as `Superseded` instead of
/// being delivered out of order.
async fn gated_fetch<T, Fut>(gate: &SequenceGate, fetch: Fut) -> Result<T, RemoteError>
where
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let ticket = gate.issue();
    let value = fetch.await?;
    if !gate.is_current(ticket) {
        debug!(ticket, "discarding stale response");
        return Err(RemoteError::Superseded);
    }
    Ok(value)
}

impl RemoteStore for MockApiClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, RemoteError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("products cache hit");
            return Ok((*products).clone());
        }

        let products: Vec<Product> = gated_fetch(&self.inner.products_gate, async {
            Ok(self
                .inner
                .client
                .get(self.inner.products_url.clone())
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?)
        })
        .await?;

        self.inner
            .cache
            .insert(
                CacheKey::Products,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, RemoteError> {
        let key = CacheKey::Product(id.as_str().to_owned());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("product cache hit");
            return Ok((*product).clone());
        }

        let response = self
            .inner
            .client
            .get(item_url(&self.inner.products_url, id.as_str()))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(format!("product {id}")));
        }

        let product: Product = response.error_for_status()?.json().await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Arc::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_product(&self, payload: &NewProduct) -> Result<Product, RemoteError> {
        let product: Product = self
            .inner
            .client
            .post(self.inner.products_url.clone())
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.invalidate_products().await;
        Ok(product)
    }

    #[instrument(skip(self, payload), fields(id = %id))]
    async fn update_product(
        &self,
        id: &ProductId,
        payload: &NewProduct,
    ) -> Result<Product, RemoteError> {
        let response = self
            .inner
            .client
            .put(item_url(&self.inner.products_url, id.as_str()))
            .json(payload)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(format!("product {id}")));
        }

        let product: Product = response.error_for_status()?.json().await?;

        self.invalidate_products().await;
        Ok(product)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), RemoteError> {
        let response = self
            .inner
            .client
            .delete(item_url(&self.inner.products_url, id.as_str()))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(format!("product {id}")));
        }

        response.error_for_status()?;
        self.invalidate_products().await;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        gated_fetch(&self.inner.users_gate, async {
            Ok(self
                .inner
                .client
                .get(self.inner.users_url.clone())
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?)
        })
        .await
    }

    #[instrument(skip(self, payload), fields(email = %payload.email))]
    async fn create_user(&self, payload: &NewUser) -> Result<UserRecord, RemoteError> {
        let user: UserRecord = self
            .inner
            .client
            .post(self.inner.users_url.clone())
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(user)
    }
}
