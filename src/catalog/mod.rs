pub mod source;
pub mod store;

pub use source::{CatalogSource, JsonFileSource};
pub use store::{CatalogStats, CatalogStore};
