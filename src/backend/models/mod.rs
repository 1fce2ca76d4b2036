pub mod common;
pub mod init;
pub mod material;
pub mod material_config;
pub mod stats;
pub mod transaction_status;

// Re-export common types/enums for easier access
pub use common::*;
pub use material::{Lifecycle, Material};
pub use material_config::{MaterialConfig, StoreBackend};
pub use stats::MaterialStats;
pub use transaction_status::{TransactionStatus, TxPhase};
