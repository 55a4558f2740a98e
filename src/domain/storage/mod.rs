//! Storage domain - Generic storage abstraction layer

mod entity;
mod query;
mod repository;

pub use entity::{StorageEntity, StorageKey};
pub use query::{Filter, FilterOp, SortDirection, SortOrder, StoreQuery};
pub use repository::Storage;

#[cfg(test)]
pub use repository::mock;
