#![forbid(unsafe_code)]

pub mod attempt_store;
pub mod repository;
pub mod sqlite;

pub use attempt_store::{LocalAttemptStore, STORAGE_PREFIX};
pub use repository::{InMemoryKeyValueStore, KeyValueStore, Storage, StorageError};
