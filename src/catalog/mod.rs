mod helpers;
mod types;

pub use helpers::{HelperCatalog, HelperEntry};
pub use types::{PropertyMetadata, TypeCatalog, TypeMetadata, TypeResolver};
