pub mod catalog;
pub mod pack_store;

pub use catalog::{load_catalog, load_previews, Catalog};
pub use pack_store::PackStore;
