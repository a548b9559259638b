//! Object storage adapters.

mod in_memory_object_storage;
mod local_object_storage;

pub use in_memory_object_storage::InMemoryObjectStorage;
pub use local_object_storage::{LocalObjectStorage, MAX_OBJECT_SIZE_BYTES};
