// src/backend/lib.rs

pub mod adapter;
pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use crate::error::MaterialError;
use crate::metrics::MaterialMetrics;
use crate::models::init::InitArgs;
use crate::models::{Material, MaterialConfig, MaterialStats, TransactionStatus};
use crate::services::material_service::ReconcileReport;
use crate::api::{CompleteMaterialRequest, CreateMaterialRequest};
use std::time::Duration;

#[ic_cdk::init]
fn init(args: InitArgs) {
    utils::logging::init_logging();
    let config = MaterialConfig::from_init_args(args);
    if let Err(e) = storage::config::set_config(config.clone()) {
        tracing::error!("Failed to persist config: {}", e);
    }
    api::install(&config);
    schedule_rng_seeding();
    tracing::info!("Learning material canister initialized.");
}

#[ic_cdk::post_upgrade]
fn post_upgrade() {
    utils::logging::init_logging();
    let config = storage::config::get_config();
    api::install(&config);
    schedule_rng_seeding();
    tracing::info!("Learning material canister upgraded.");
}

// raw_rand is an inter-canister call, which init cannot await.
fn schedule_rng_seeding() {
    ic_cdk_timers::set_timer(Duration::ZERO, || {
        ic_cdk::spawn(async {
            if let Err(e) = utils::rng::initialize_internal_rng().await {
                tracing::error!("Failed to seed internal RNG: {}", e);
            }
        })
    });
}

// Export Candid interface
ic_cdk::export_candid!();
