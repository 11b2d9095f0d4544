pub mod file;
pub mod quota;

pub use file::FileStorage;
pub use quota::QuotaStorage;
