// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// Define Memory IDs for stable structures
// Choose non-overlapping IDs
const CONFIG_MEM_ID: MemoryId = MemoryId::new(0);
const METRICS_MEM_ID: MemoryId = MemoryId::new(1);
const KV_STORE_MEM_ID: MemoryId = MemoryId::new(2);

// Define memory type alias
pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> = RefCell::new(
        MemoryManager::init(DefaultMemoryImpl::default())
    );
}

/// Get memory instance for a specific MemoryId.
pub fn get_memory(id: MemoryId) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(id))
}

pub fn get_config_memory() -> Memory {
    get_memory(CONFIG_MEM_ID)
}

pub fn get_metrics_memory() -> Memory {
    get_memory(METRICS_MEM_ID)
}

/// Backing memory of the canister-local key/value store.
pub fn get_kv_store_memory() -> Memory {
    get_memory(KV_STORE_MEM_ID)
}
