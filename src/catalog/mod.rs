pub mod store;

pub use store::CatalogError;
pub use store::CatalogStore;
