pub mod error;
pub mod rest;
pub mod store;

pub use error::StoreError;
pub use rest::RestStore;
pub use store::ClientStore;
