// src/backend/models/init.rs
use crate::models::material_config::StoreBackend;
use candid::{CandidType, Principal};
use serde::Deserialize;

/// Install arguments. Unset optional fields keep the `MaterialConfig` defaults.
#[derive(CandidType, Deserialize, Debug, Clone)]
pub struct InitArgs {
    pub admin_principal: Principal,
    pub store: Option<StoreBackend>,
    pub ready_delay_secs: Option<u64>,
    pub success_dismiss_secs: Option<u64>,
    pub error_dismiss_secs: Option<u64>,
}
