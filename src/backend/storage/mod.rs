// src/backend/storage/mod.rs
// Stable memory layout and the key/value layout of material records

pub mod config;
pub mod kv_store;
pub mod material_index;
pub mod materials;
pub mod memory;
pub mod metrics;
pub mod storable;

// Re-export key storage structures and functions for easier access
pub use kv_store::{KeyValueStore, StableKvStore};
pub use material_index::{MaterialIndex, PendingJournal, INDEX_KEY, PENDING_KEY};
pub use materials::record_key;
pub use memory::Memory;
pub use storable::Cbor;
