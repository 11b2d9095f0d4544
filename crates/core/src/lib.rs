pub mod cart;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod storage;

pub use cart::{CartStore, CartUpdate, DEFAULT_CART_KEY};
pub use catalog::{Catalog, CatalogError};
pub use domain::cart::{CartItems, CartLine};
pub use domain::product::{Product, ProductId, Section};
pub use errors::DomainError;
pub use storage::{DisabledStorage, KeyValueStorage, MemoryStorage, StorageError};
