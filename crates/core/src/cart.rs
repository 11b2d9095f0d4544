//! The cart store: quantities per product, persisted after every mutation.
//!
//! Persisted layout is a single storage entry holding a JSON object of product id
//! (as a string) to positive integer quantity, e.g. `{"2":1,"4":2}`.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::domain::cart::{CartItems, CartLine};
use crate::domain::product::ProductId;
use crate::errors::DomainError;
use crate::pricing;
use crate::storage::{KeyValueStorage, StorageError};

pub const DEFAULT_CART_KEY: &str = "pearlCart";

/// Outcome of a cart mutation. Hosts use `item_count` to refresh count badges.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartUpdate {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub item_count: u64,
    pub persisted: bool,
}

#[derive(Debug, Error)]
pub enum CartDecodeError {
    #[error("cart payload is not a JSON object of quantities: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct CartStore<S> {
    storage: S,
    key: String,
    catalog: Arc<Catalog>,
    items: CartItems,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Creates an empty store; call [`CartStore::load`] to pick up persisted state.
    pub fn new(storage: S, catalog: Arc<Catalog>) -> Self {
        Self { storage, key: DEFAULT_CART_KEY.to_string(), catalog, items: CartItems::new() }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Adds `quantity` units. Fails without touching the cart or storage when the result
    /// would not fit in a `u32`.
    pub fn add(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartUpdate, DomainError> {
        let resulting = self.items.add(product_id, quantity)?;
        debug!(
            event_name = "storefront.cart.add",
            product_id = product_id.0,
            delta = quantity,
            quantity = resulting.unwrap_or(0),
            "cart quantity incremented"
        );
        Ok(self.commit(product_id, resulting))
    }

    pub fn increment(&mut self, product_id: ProductId) -> Result<CartUpdate, DomainError> {
        self.add(product_id, 1)
    }

    pub fn set(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartUpdate, DomainError> {
        let resulting = self.items.set(product_id, quantity)?;
        debug!(
            event_name = "storefront.cart.set",
            product_id = product_id.0,
            requested = quantity,
            quantity = resulting.unwrap_or(0),
            "cart quantity overwritten"
        );
        Ok(self.commit(product_id, resulting))
    }

    pub fn remove(&mut self, product_id: ProductId) -> CartUpdate {
        self.items.remove(product_id);
        debug!(event_name = "storefront.cart.remove", product_id = product_id.0, "cart entry removed");
        self.commit(product_id, None)
    }

    /// Persists the cart, logging and swallowing any storage failure.
    pub fn save(&mut self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    event_name = "storefront.cart.save_failed",
                    key = %self.key,
                    error = %error,
                    "unable to save cart; changes are kept in memory only"
                );
                false
            }
        }
    }

    pub fn try_save(&mut self) -> Result<(), StorageError> {
        let payload = encode_items(&self.items);
        self.storage.set_item(&self.key, &payload)
    }

    /// Replaces the in-memory cart with the persisted one. Missing, unreadable, or
    /// malformed data leaves an empty cart.
    pub fn load(&mut self) {
        self.items = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => decode_items(&raw).unwrap_or_else(|error| {
                warn!(
                    event_name = "storefront.cart.load_corrupt",
                    key = %self.key,
                    error = %error,
                    "persisted cart is malformed; starting with an empty cart"
                );
                CartItems::new()
            }),
            Ok(None) => CartItems::new(),
            Err(error) => {
                warn!(
                    event_name = "storefront.cart.load_failed",
                    key = %self.key,
                    error = %error,
                    "unable to read persisted cart; starting with an empty cart"
                );
                CartItems::new()
            }
        };
        debug!(
            event_name = "storefront.cart.loaded",
            entries = self.items.len(),
            item_count = self.items.count(),
            "cart loaded"
        );
    }

    pub fn count(&self) -> u64 {
        self.items.count()
    }

    /// Entries whose product resolves in the catalog, in cart order.
    pub fn list(&self) -> Vec<CartLine<'_>> {
        self.items
            .iter()
            .filter_map(|(product_id, quantity)| {
                self.catalog.find(product_id).map(|product| CartLine { product, quantity })
            })
            .collect()
    }

    pub fn subtotal(&self) -> Decimal {
        pricing::subtotal(&self.list())
    }

    pub fn quantity(&self, product_id: ProductId) -> Option<u32> {
        self.items.quantity(product_id)
    }

    pub fn items(&self) -> &CartItems {
        &self.items
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, product_id: ProductId, quantity: Option<u32>) -> CartUpdate {
        let persisted = self.save();
        CartUpdate { product_id, quantity, item_count: self.items.count(), persisted }
    }
}

pub fn encode_items(items: &CartItems) -> String {
    let mut payload = serde_json::Map::with_capacity(items.len());
    for (product_id, quantity) in items.iter() {
        payload.insert(product_id.to_string(), serde_json::Value::from(quantity));
    }
    serde_json::Value::Object(payload).to_string()
}

/// Decodes a persisted cart. Entries that do not hold a positive `u32` quantity for a
/// positive integer id are dropped.
pub fn decode_items(raw: &str) -> Result<CartItems, CartDecodeError> {
    let payload: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)?;
    let mut items = CartItems::new();

    for (key, value) in payload {
        let product_id = match key.parse::<ProductId>() {
            Ok(product_id) => product_id,
            Err(_) => {
                debug!(event_name = "storefront.cart.entry_dropped", key = %key, "non-numeric cart key");
                continue;
            }
        };
        let stored = match value.as_i64() {
            Some(quantity) if quantity > 0 => items.set(product_id, quantity).is_ok(),
            _ => false,
        };
        if !stored {
            debug!(
                event_name = "storefront.cart.entry_dropped",
                key = %key,
                value = %value,
                "cart entry without a storable positive quantity"
            );
        }
    }

    Ok(items)
}
