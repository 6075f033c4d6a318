//! Cart behavior against catalog products fetched from the remote store.

use std::sync::Arc;

use tienda_integration_tests::InMemoryRemote;
use tienda_storefront::remote::RemoteStore;
use tienda_storefront::services::cart::{CartError, CartManager};
use tienda_storefront::services::session::SessionManager;
use tienda_storefront::storage::{MemoryStorage, StorageBackend};

#[tokio::test]
async fn browse_add_and_total() {
    let remote = InMemoryRemote::new();
    remote.seed_product("Mate Imperial", "1500.50", 10);
    remote.seed_product("Bombilla Alpaca", "800", 4);

    let products = remote.list_products().await.unwrap();
    assert_eq!(products.len(), 2);

    let cart = CartManager::new(Arc::new(MemoryStorage::new()));
    cart.add_item(products.first().unwrap(), 2).unwrap();
    cart.add_item(products.get(1).unwrap(), 1).unwrap();

    assert_eq!(cart.total_quantity(), 3);
    // 2 * 1500.50 + 800 = 3801.00
    assert_eq!(cart.total_amount().to_string(), "3801.00");
}

#[tokio::test]
async fn stock_ceiling_is_enforced_across_merges() {
    let remote = InMemoryRemote::new();
    let mate = remote.seed_product("Mate", "100", 5);

    let cart = CartManager::new(Arc::new(MemoryStorage::new()));
    cart.add_item(&mate, 3).unwrap();

    let err = cart.add_item(&mate, 3).unwrap_err();
    assert!(matches!(
        err,
        CartError::InsufficientStock {
            available: 5,
            in_cart: 3,
            requested: 3,
            ..
        }
    ));
    assert_eq!(cart.total_quantity(), 3, "rejected add has no partial effect");

    cart.add_item(&mate, 2).unwrap();
    assert_eq!(cart.total_quantity(), 5);
}

#[tokio::test]
async fn checkout_clears_cart_and_persisted_snapshot() {
    let remote = InMemoryRemote::new();
    let mate = remote.seed_product("Mate", "100", 5);

    let storage = Arc::new(MemoryStorage::new());
    let cart = CartManager::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
    cart.add_item(&mate, 2).unwrap();

    // Checkout completion empties the cart
    cart.clear();
    assert_eq!(cart.total_quantity(), 0);

    // And a "reload" sees the empty cart, not the old snapshot
    let reloaded = CartManager::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
    assert!(reloaded.lines().is_empty());
}

#[tokio::test]
async fn login_does_not_inherit_or_clear_existing_cart() {
    // The managers are independent leaves: logging in leaves whatever cart
    // the device already had untouched. Only logout/checkout clear it, and
    // that composition happens in the UI layer.
    let remote = Arc::new(InMemoryRemote::new());
    let mate = remote.seed_product("Mate", "100", 5);
    remote.seed_user("ana@example.com", "secreta", false);

    let storage: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());
    let cart = CartManager::new(Arc::clone(&storage));
    cart.add_item(&mate, 2).unwrap();

    let session = SessionManager::new(Arc::clone(&remote), Arc::clone(&storage));
    session.login("ana@example.com", "secreta").await.unwrap();

    assert_eq!(cart.total_quantity(), 2);
}
