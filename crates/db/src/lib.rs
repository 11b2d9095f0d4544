pub mod backends;
pub mod connection;

pub use backends::{FileStorage, QuotaStorage};
pub use connection::{open_storage, DynStorage};
