pub mod configured_store;
pub mod kv_contract_adapter;

pub use configured_store::ConfiguredStore;
pub use kv_contract_adapter::ContractKvStore;
