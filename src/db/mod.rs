pub mod catalog;
pub mod memory;
pub mod postgres;

pub use catalog::{CatalogQuery, CatalogRepository, Filter, SortOrder, TextField};
pub use memory::MemoryCatalog;
pub use postgres::{create_pool, PgCatalog};
