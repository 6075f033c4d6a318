//! Cart manager.
//!
//! Owns the ordered collection of cart lines: at most one line per product,
//! every quantity within `[1, stock]`. Mutations are synchronous, atomic on
//! failure, and persist the whole collection to the cart slot before
//! returning. Construction restores the persisted snapshot, substituting an
//! empty cart on any parse failure.

mod error;

pub use error::CartError;

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

use tienda_core::{PriceValue, ProductId, StockValue};

use crate::models::storage_keys;
use crate::models::Product;
use crate::storage::StorageBackend;

/// One cart line: a product reference plus the quantity held.
///
/// Price and stock are carried in their raw remote shape; the stock ceiling
/// is re-parsed on every quantity change so a snapshot whose stock field has
/// gone bad degrades to "leave the line alone" instead of corrupting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line holds.
    pub product_id: ProductId,
    /// Product display name at time of add.
    pub name: String,
    /// Unit price at time of add.
    #[serde(default)]
    pub price: PriceValue,
    /// Stock ceiling at time of add.
    #[serde(default)]
    pub stock: StockValue,
    /// Quantity held, always in `[1, stock]`.
    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.clone(),
            stock: product.stock.clone(),
            quantity,
        }
    }

    /// Price times quantity, with an unparsable price counted as zero.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.or_zero() * Decimal::from(self.quantity)
    }
}

/// Cart manager.
///
/// Construct once at startup (restoring any persisted cart) and inject into
/// the UI layer. Observers subscribe via [`CartManager::subscribe`].
pub struct CartManager {
    storage: Arc<dyn StorageBackend>,
    lines: watch::Sender<Vec<CartLine>>,
}

impl CartManager {
    /// Create a manager, restoring the persisted cart if parseable.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        let lines = restore_lines(storage.as_ref());
        Self {
            storage,
            lines: watch::Sender::new(lines),
        }
    }

    /// Add a product to the cart, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidStock` if the product's stock field is not
    /// a non-negative integer, and `CartError::InsufficientStock` if the
    /// merged quantity would exceed the stock ceiling. The cart is unchanged
    /// on every failure.
    pub fn add_item(&self, product: &Product, quantity: u32) -> Result<(), CartError> {
        let stock = product.stock.parse().ok_or_else(|| {
            warn!(product = %product.id, stock = ?product.stock, "invalid stock on add");
            CartError::InvalidStock {
                name: product.name.clone(),
            }
        })?;

        let mut lines = self.lines.borrow().clone();

        if let Some(line) = lines.iter_mut().find(|l| l.product_id == product.id) {
            let merged = line.quantity.saturating_add(quantity);
            if merged > stock {
                return Err(CartError::InsufficientStock {
                    name: product.name.clone(),
                    available: stock,
                    in_cart: line.quantity,
                    requested: quantity,
                });
            }
            line.quantity = merged;
        } else {
            if quantity > stock {
                return Err(CartError::InsufficientStock {
                    name: product.name.clone(),
                    available: stock,
                    in_cart: 0,
                    requested: quantity,
                });
            }
            lines.push(CartLine::from_product(product, quantity));
        }

        self.commit(lines);
        Ok(())
    }

    /// Remove a line. No-op and no error if the product is not in the cart.
    pub fn remove_item(&self, product_id: &ProductId) {
        let mut lines = self.lines.borrow().clone();
        let before = lines.len();
        lines.retain(|l| l.product_id != *product_id);
        if lines.len() != before {
            self.commit(lines);
        }
    }

    /// Set a line's quantity, clamped into `[1, stock]`.
    ///
    /// Values below 1 are raised to 1 - this is a clamping policy, not a
    /// validation error. If the line's stock no longer parses, the mutation
    /// is skipped and the line retained unchanged. Absent products are a
    /// no-op.
    pub fn set_quantity(&self, product_id: &ProductId, quantity: i64) {
        let mut lines = self.lines.borrow().clone();
        let mut changed = false;

        for line in &mut lines {
            if line.product_id != *product_id {
                continue;
            }
            let Some(stock) = line.stock.parse() else {
                warn!(product = %line.product_id, stock = ?line.stock,
                      "invalid stock on quantity change; line left unchanged");
                return;
            };
            // Not `clamp`: a zero stock ceiling still floors the quantity to 1
            #[allow(clippy::manual_clamp)]
            let resolved = quantity.min(i64::from(stock)).max(1);
            let resolved = u32::try_from(resolved).unwrap_or(1);
            if line.quantity != resolved {
                line.quantity = resolved;
                changed = true;
            }
        }

        if changed {
            self.commit(lines);
        }
    }

    /// Empty the cart unconditionally.
    pub fn clear(&self) {
        self.commit(Vec::new());
    }

    /// Sum of all lines' quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .borrow()
            .iter()
            .map(|l| u64::from(l.quantity))
            .sum()
    }

    /// Sum of unit price times quantity across all lines, rounded to two
    /// decimal places (half away from zero). Unparsable prices count as zero.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        let mut total = self
            .lines
            .borrow()
            .iter()
            .map(CartLine::line_total)
            .sum::<Decimal>()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // Always a two-decimal amount, so `10` displays as `10.00`
        total.rescale(2);
        total
    }

    /// A snapshot of the current lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines.borrow().clone()
    }

    /// Subscribe to cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLine>> {
        self.lines.subscribe()
    }

    /// Persist and publish a new line collection.
    ///
    /// Enforces the quantity invariant (a line resolved to zero is dropped,
    /// never retained), persists before notifying, and treats a failed write
    /// as best-effort.
    fn commit(&self, mut lines: Vec<CartLine>) {
        lines.retain(|l| l.quantity > 0);

        match serde_json::to_string(&lines) {
            Ok(json) => {
                if let Err(e) = self.storage.write(storage_keys::CART, &json) {
                    warn!(error = %e, "failed to persist cart snapshot");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize cart snapshot"),
        }

        self.lines.send_replace(lines);
    }
}

/// Read and parse the persisted cart, substituting empty on any failure.
fn restore_lines(storage: &dyn StorageBackend) -> Vec<CartLine> {
    storage
        .read(storage_keys::CART)
        .map_or_else(Vec::new, |raw| match serde_json::from_str(&raw) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(error = %e, "discarding corrupt cart snapshot");
                Vec::new()
            }
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::storage::MemoryStorage;

    fn product(id: &str, name: &str, price: &str, stock: i64) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "nombre": name,
            "precio": price,
            "stock": stock,
        }))
        .unwrap()
    }

    fn cart() -> (CartManager, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartManager::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
        (cart, storage)
    }

    #[test]
    fn test_distinct_adds_sum_quantities() {
        let (cart, _) = cart();
        cart.add_item(&product("1", "Mate", "100", 10), 2).unwrap();
        cart.add_item(&product("2", "Bombilla", "50", 10), 3).unwrap();
        cart.add_item(&product("3", "Yerba", "30", 10), 1).unwrap();

        assert_eq!(cart.total_quantity(), 6);
        assert_eq!(cart.lines().len(), 3);
    }

    #[test]
    fn test_repeat_add_merges_into_one_line() {
        let (cart, _) = cart();
        let mate = product("1", "Mate", "100", 5);

        cart.add_item(&mate, 2).unwrap();
        cart.add_item(&mate, 1).unwrap();

        let lines = cart.lines();
        assert_eq!(lines.len(), 1, "at most one line per product");
        assert_eq!(lines.first().unwrap().quantity, 3);
    }

    #[test]
    fn test_merge_exceeding_stock_is_all_or_nothing() {
        let (cart, _) = cart();
        let mate = product("1", "Mate", "100", 5);

        cart.add_item(&mate, 3).unwrap();
        let err = cart.add_item(&mate, 3).unwrap_err();

        assert_eq!(
            err,
            CartError::InsufficientStock {
                name: "Mate".to_owned(),
                available: 5,
                in_cart: 3,
                requested: 3,
            }
        );
        // No partial fulfillment: quantity stays at 3
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_first_add_exceeding_stock_rejected() {
        let (cart, _) = cart();
        let err = cart.add_item(&product("1", "Mate", "100", 2), 3).unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { in_cart: 0, .. }));
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_invalid_stock_rejected_without_change() {
        let (cart, _) = cart();
        cart.add_item(&product("1", "Mate", "100", 5), 1).unwrap();

        let bad: Product = serde_json::from_value(json!({
            "id": "2",
            "nombre": "Termo",
            "precio": "900",
            "stock": "unlimited",
        }))
        .unwrap();

        let err = cart.add_item(&bad, 1).unwrap_err();
        assert_eq!(err, CartError::InvalidStock { name: "Termo".to_owned() });
        assert_eq!(cart.lines().len(), 1);

        // Negative stock is invalid too, not a zero ceiling
        let negative: Product = serde_json::from_value(json!({
            "id": "3", "nombre": "Pava", "stock": -4,
        }))
        .unwrap();
        assert!(matches!(
            cart.add_item(&negative, 1),
            Err(CartError::InvalidStock { .. })
        ));
    }

    #[test]
    fn test_remove_item_and_absent_noop() {
        let (cart, _) = cart();
        cart.add_item(&product("1", "Mate", "100", 5), 1).unwrap();

        cart.remove_item(&ProductId::new("1"));
        assert!(cart.lines().is_empty());

        // Removing an absent product is a silent no-op
        cart.remove_item(&ProductId::new("1"));
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_stock_and_floor() {
        let (cart, _) = cart();
        cart.add_item(&product("1", "Mate", "100", 5), 2).unwrap();
        let id = ProductId::new("1");

        cart.set_quantity(&id, 99);
        assert_eq!(cart.lines().first().unwrap().quantity, 5);

        cart.set_quantity(&id, 0);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);

        cart.set_quantity(&id, -7);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);
    }

    #[test]
    fn test_set_quantity_absent_product_does_not_notify() {
        let (cart, _) = cart();
        cart.add_item(&product("1", "Mate", "100", 5), 2).unwrap();

        let mut rx = cart.subscribe();
        rx.borrow_and_update();

        cart.set_quantity(&ProductId::new("404"), 4);
        assert!(!rx.has_changed().unwrap(), "unchanged cart must not notify");
        assert_eq!(cart.total_quantity(), 2);

        // Same-value set is equally a no-op
        cart.set_quantity(&ProductId::new("1"), 2);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_set_quantity_skips_line_with_unparsable_stock() {
        // Simulate an old snapshot whose stock field has gone bad
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(
                storage_keys::CART,
                r#"[{"product_id":"1","name":"Mate","price":"100","stock":"???","quantity":2}]"#,
            )
            .unwrap();

        let cart = CartManager::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
        cart.set_quantity(&ProductId::new("1"), 4);

        // Mutation skipped, line retained unchanged
        assert_eq!(cart.lines().first().unwrap().quantity, 2);
    }

    #[test]
    fn test_total_amount_rounds_half_away_from_zero() {
        let (cart, _) = cart();
        cart.add_item(&product("1", "Mate", "10.00", 10), 2).unwrap();
        cart.add_item(&product("2", "Bombilla", "5.005", 10), 1).unwrap();

        // 20.00 + 5.005 = 25.005 -> 25.01
        assert_eq!(cart.total_amount().to_string(), "25.01");
    }

    #[test]
    fn test_total_amount_unparsable_price_counts_as_zero() {
        let (cart, _) = cart();
        let freebie: Product = serde_json::from_value(json!({
            "id": "1", "nombre": "Folleto", "precio": "gratis", "stock": 3,
        }))
        .unwrap();
        cart.add_item(&freebie, 2).unwrap();
        cart.add_item(&product("2", "Mate", "10", 10), 1).unwrap();

        assert_eq!(cart.total_amount().to_string(), "10.00");
    }

    #[test]
    fn test_clear_empties_cart_and_storage() {
        let (cart, storage) = cart();
        cart.add_item(&product("1", "Mate", "100", 5), 2).unwrap();

        cart.clear();

        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(storage.read(storage_keys::CART).as_deref(), Some("[]"));
    }

    #[test]
    fn test_mutations_persist_before_returning() {
        let (cart, storage) = cart();
        cart.add_item(&product("1", "Mate", "100", 5), 2).unwrap();

        let raw = storage.read(storage_keys::CART).unwrap();
        let persisted: Vec<CartLine> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, cart.lines());
    }

    #[test]
    fn test_restore_across_instances() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let cart = CartManager::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
            cart.add_item(&product("1", "Mate", "100", 5), 2).unwrap();
        }

        let restored = CartManager::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
        assert_eq!(restored.total_quantity(), 2);
        assert_eq!(restored.lines().first().unwrap().name, "Mate");
    }

    #[test]
    fn test_restore_corrupt_snapshot_yields_empty_cart() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(storage_keys::CART, "not json at all").unwrap();

        let cart = CartManager::new(Arc::clone(&storage) as Arc<dyn StorageBackend>);
        assert!(cart.lines().is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_subscribe_observes_every_mutation() {
        let (cart, _) = cart();
        let rx = cart.subscribe();

        cart.add_item(&product("1", "Mate", "100", 5), 1).unwrap();
        assert_eq!(rx.borrow().len(), 1);

        cart.clear();
        assert!(rx.borrow().is_empty());
    }
}
