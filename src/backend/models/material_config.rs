// src/backend/models/material_config.rs
use crate::models::init::InitArgs;
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_READY_DELAY_SECS: u64 = 3;
pub const DEFAULT_SUCCESS_DISMISS_SECS: u64 = 2;
pub const DEFAULT_ERROR_DISMISS_SECS: u64 = 3;

/// Where material records are persisted.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Key/value map kept in this canister's stable memory.
    Local,
    /// Remote key/value contract reached through inter-canister calls.
    Contract(Principal),
}

/// Canister-wide configuration, persisted across upgrades.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MaterialConfig {
    pub admin: Principal,
    pub store: StoreBackend,
    pub ready_delay_secs: u64,
    pub success_dismiss_secs: u64,
    pub error_dismiss_secs: u64,
    /// Availability flag of the local store, kept across upgrades. Ignored
    /// for a remote contract.
    #[serde(default = "default_local_store_available")]
    pub local_store_available: bool,
}

fn default_local_store_available() -> bool {
    true
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            admin: Principal::anonymous(),
            store: StoreBackend::Local,
            ready_delay_secs: DEFAULT_READY_DELAY_SECS,
            success_dismiss_secs: DEFAULT_SUCCESS_DISMISS_SECS,
            error_dismiss_secs: DEFAULT_ERROR_DISMISS_SECS,
            local_store_available: true,
        }
    }
}

impl MaterialConfig {
    pub fn from_init_args(args: InitArgs) -> Self {
        let defaults = MaterialConfig::default();
        Self {
            admin: args.admin_principal,
            store: args.store.unwrap_or(defaults.store),
            ready_delay_secs: args.ready_delay_secs.unwrap_or(defaults.ready_delay_secs),
            success_dismiss_secs: args.success_dismiss_secs.unwrap_or(defaults.success_dismiss_secs),
            error_dismiss_secs: args.error_dismiss_secs.unwrap_or(defaults.error_dismiss_secs),
            local_store_available: defaults.local_store_available,
        }
    }

    pub fn ready_delay(&self) -> Duration {
        Duration::from_secs(self.ready_delay_secs)
    }

    pub fn success_dismiss(&self) -> Duration {
        Duration::from_secs(self.success_dismiss_secs)
    }

    pub fn error_dismiss(&self) -> Duration {
        Duration::from_secs(self.error_dismiss_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_args_override_only_what_they_set() {
        let admin = Principal::from_slice(&[1, 2, 3]);
        let config = MaterialConfig::from_init_args(InitArgs {
            admin_principal: admin,
            store: None,
            ready_delay_secs: Some(10),
            success_dismiss_secs: None,
            error_dismiss_secs: None,
        });
        assert_eq!(config.admin, admin);
        assert_eq!(config.store, StoreBackend::Local);
        assert_eq!(config.ready_delay(), Duration::from_secs(10));
        assert_eq!(config.success_dismiss(), Duration::from_secs(DEFAULT_SUCCESS_DISMISS_SECS));
        assert_eq!(config.error_dismiss(), Duration::from_secs(DEFAULT_ERROR_DISMISS_SECS));
        assert!(config.local_store_available);
    }

    #[test]
    fn config_written_before_the_availability_flag_reads_as_available() {
        #[derive(Serialize)]
        struct OlderConfig {
            admin: Principal,
            store: StoreBackend,
            ready_delay_secs: u64,
            success_dismiss_secs: u64,
            error_dismiss_secs: u64,
        }
        let mut bytes = Vec::new();
        ciborium::into_writer(
            &OlderConfig {
                admin: Principal::anonymous(),
                store: StoreBackend::Local,
                ready_delay_secs: 3,
                success_dismiss_secs: 2,
                error_dismiss_secs: 3,
            },
            &mut bytes,
        )
        .unwrap();
        let config: MaterialConfig = ciborium::from_reader(bytes.as_slice()).unwrap();
        assert!(config.local_store_available);
    }
}
