//! Data module - grade sheet loading and normalization

mod cache;
mod loader;
mod normalize;
mod table;

pub use cache::TableCache;
pub use loader::TableLoader;
pub use normalize::{normalize_email, Category};
pub use table::{Record, SheetSchema, Table};
