//! Shopping Cart
//!
//! Information Hiding:
//! - `Cart` holds the pure state transitions (add, remove, update, totals)
//! - Persistence, rendering and notices live in `CartStore` and are injected
//! - The persisted JSON shape is owned by `LineItem`'s serde derive

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub mod store;
pub mod view;

pub use store::{load_cart, CartStore, CartStoreBuilder};
pub use view::{CartView, CountBadge, Detached, Notice, NoticeBoard, NoticePhase, Notifier};

/// Opaque product identifier
///
/// Storefront payloads carry ids as JSON numbers, but hand-written markup
/// may pass strings. A numeric id never equals a textual one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    /// Integers become numeric ids; anything else is kept as text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => ProductId::Number(n),
            Err(_) => ProductId::Text(s.to_string()),
        })
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId::Number(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::Text(id)
    }
}

/// What an "add to cart" button knows about a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Prices must be finite and non-negative; JSON has no NaN or infinity
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// One product entry in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Ordered line items, unique by id, every quantity at least 1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from untrusted entries
    ///
    /// Entries with quantity 0 or an invalid price are dropped, and only the
    /// first entry per id is kept. Returns the cart and how many entries were
    /// discarded.
    pub fn from_items(items: Vec<LineItem>) -> (Self, usize) {
        let total = items.len();
        let mut seen = HashSet::new();
        let items: Vec<LineItem> = items
            .into_iter()
            .filter(|item| {
                item.quantity > 0 && is_valid_price(item.price) && seen.insert(item.id.clone())
            })
            .collect();
        let dropped = total - items.len();

        (Self { items }, dropped)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Increment an existing entry or append a new one with quantity 1
    ///
    /// Name and price of an existing entry are left as first seen. A product
    /// with an invalid price is rejected and false is returned.
    pub fn add(&mut self, product: Product) -> bool {
        if !is_valid_price(product.price) {
            return false;
        }

        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.items.push(LineItem {
                id: product.id,
                name: product.name,
                price: product.price,
                quantity: 1,
            }),
        }
        true
    }

    /// Returns the removed entry, if there was one
    pub fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let pos = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Set the quantity of an existing entry; `quantity <= 0` removes it
    ///
    /// Returns false when no entry has this id. Values beyond `u32::MAX`
    /// saturate.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id).is_some();
        }

        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price × quantity
    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Sum of quantities, as shown on the cart badge
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product::new(1, "Linen shirt", 10.0)
    }

    #[test]
    fn test_adding_same_product_increments_quantity() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(shirt());
        cart.add(shirt());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_first_seen_name_and_price_win() {
        let mut cart = Cart::new();
        cart.add(shirt());
        cart.add(Product::new(1, "Renamed", 99.0));

        let item = cart.get(&ProductId::Number(1)).unwrap();
        assert_eq!(item.name, "Linen shirt");
        assert_eq!(item.price, 10.0);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::new();
        cart.add(Product::new(3, "c", 1.0));
        cart.add(Product::new(1, "a", 1.0));
        cart.add(Product::new(3, "c", 1.0));
        cart.add(Product::new(2, "b", 1.0));

        let ids: Vec<_> = cart.items().iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::new();
        cart.add(Product::new(1, "a", 10.0));
        cart.add(Product::new(1, "a", 10.0));
        cart.add(Product::new(2, "b", 5.0));

        assert_eq!(cart.total(), 25.0);
        assert_eq!(Cart::new().total(), 0.0);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(shirt());

        assert!(cart.set_quantity(&ProductId::Number(1), 0));
        assert!(cart.get(&ProductId::Number(1)).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let mut cart = Cart::new();
        cart.add(shirt());

        assert!(cart.set_quantity(&ProductId::Number(1), -4));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_id() {
        let mut cart = Cart::new();
        cart.add(shirt());

        assert!(!cart.set_quantity(&ProductId::Number(2), 5));
        assert!(!cart.set_quantity(&ProductId::Number(2), 0));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_set_quantity_saturates() {
        let mut cart = Cart::new();
        cart.add(shirt());

        cart.set_quantity(&ProductId::Number(1), i64::MAX);
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(shirt());
        let before = cart.clone();

        assert!(cart.remove(&ProductId::Number(42)).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_numeric_and_text_ids_differ() {
        let mut cart = Cart::new();
        cart.add(Product::new(1, "numeric", 1.0));
        cart.add(Product::new("1", "text", 1.0));

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_from_items_enforces_invariants() {
        let item = |id: i64, quantity: u32| LineItem {
            id: ProductId::Number(id),
            name: format!("p{}", id),
            price: 1.0,
            quantity,
        };

        let mut unpriced = item(4, 1);
        unpriced.price = f64::NAN;

        let (cart, dropped) =
            Cart::from_items(vec![item(1, 2), item(2, 0), item(1, 5), item(3, 1), unpriced]);

        assert_eq!(dropped, 3);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(&ProductId::Number(1)).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_rejects_non_finite_price() {
        let mut cart = Cart::new();
        cart.add(shirt());

        assert!(!cart.add(Product::new(2, "Broken", f64::NAN)));
        assert!(!cart.add(Product::new(3, "Broken", f64::INFINITY)));
        assert!(!cart.add(Product::new(4, "Broken", -1.0)));
        assert_eq!(cart.len(), 1);
        assert!(cart.add(Product::new(5, "Gift card", 0.0)));
    }

    #[test]
    fn test_serialized_shape() {
        let mut cart = Cart::new();
        cart.add(Product::new(7, "Hoodie", 250.5));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"id": 7, "name": "Hoodie", "price": 250.5, "quantity": 1}])
        );
    }

    #[test]
    fn test_product_id_parsing() {
        assert_eq!("12".parse::<ProductId>().unwrap(), ProductId::Number(12));
        assert_eq!(
            "sku-12".parse::<ProductId>().unwrap(),
            ProductId::Text("sku-12".to_string())
        );
        assert_eq!(ProductId::Text("abc".into()).to_string(), "abc");
    }
}
