// src/backend/api.rs
// Candid endpoints of the learning material canister

use crate::{
    adapter::ConfiguredStore,
    error::MaterialError,
    metrics::{get_material_metrics, MaterialMetrics},
    models::{common::*, Material, MaterialConfig, MaterialStats, TransactionStatus},
    services::{
        material_service::{MaterialRepository, ReconcileReport},
        scheduler::TimerScheduler,
        session::MaterialSession,
        stats_service::compute_stats,
    },
    storage::config::{get_config as get_stored_config, update_config},
    utils::guards::{check_admin, check_wallet_connected},
};
use candid::{CandidType, Principal};
use ic_cdk::caller;
use ic_cdk_macros::{query, update};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use validator::Validate;

type Session = MaterialSession<ConfiguredStore, TimerScheduler>;

thread_local! {
    static STORE: RefCell<Option<Rc<ConfiguredStore>>> = RefCell::new(None);
    // Sessions of callers with timers or a status in flight; idle ones are evicted.
    static SESSIONS: RefCell<HashMap<Principal, Rc<Session>>> = RefCell::new(HashMap::new());
}

/// Builds the store selected by `config` and drops every existing session.
pub fn install(config: &MaterialConfig) {
    let store = Rc::new(ConfiguredStore::from_config(config));
    STORE.with(|s| *s.borrow_mut() = Some(store));
    let dropped: Vec<Rc<Session>> = SESSIONS.with(|s| s.borrow_mut().drain().map(|(_, v)| v).collect());
    for session in &dropped {
        session.teardown();
    }
    tracing::info!("Material store installed with backend {:?}", config.store);
}

fn store() -> Result<Rc<ConfiguredStore>, MaterialError> {
    STORE.with(|s| s.borrow().clone()).ok_or_else(|| {
        MaterialError::InternalError("Material store is not installed".to_string())
    })
}

fn repository() -> Result<MaterialRepository<ConfiguredStore>, MaterialError> {
    Ok(MaterialRepository::new(store()?))
}

fn session_for(principal: Principal) -> Result<Rc<Session>, MaterialError> {
    evict_idle_sessions();
    if let Some(session) = SESSIONS.with(|s| s.borrow().get(&principal).cloned()) {
        return Ok(session);
    }
    let session = Rc::new(MaterialSession::new(
        store()?,
        Rc::new(TimerScheduler),
        &get_stored_config(),
    ));
    SESSIONS.with(|s| s.borrow_mut().insert(principal, Rc::clone(&session)));
    Ok(session)
}

// A session still referenced by an in-flight call is kept even when idle.
fn evict_idle_sessions() {
    SESSIONS.with(|s| {
        let mut sessions = s.borrow_mut();
        let before = sessions.len();
        sessions.retain(|_, session| Rc::strong_count(session) > 1 || !session.is_idle());
        if sessions.len() != before {
            tracing::debug!("Evicted {} idle sessions", before - sessions.len());
        }
    });
}

/// Pauses or resumes the local store and persists the flag across upgrades.
fn apply_store_availability(available: bool) -> Result<(), MaterialError> {
    store()?.set_available(available)?;
    update_config(|config| config.local_store_available = available)?;
    Ok(())
}

fn admin_guard() -> Result<(), MaterialError> {
    check_admin(caller(), get_stored_config().admin)
}

// --- Validation Helper ---
fn validate_request<T: Validate>(req: &T) -> Result<(), MaterialError> {
    req.validate().map_err(|e| MaterialError::InvalidInput(e.to_string()))
}

// --- Request structs ---

#[derive(CandidType, Deserialize, Clone, Debug, Default, Validate)]
pub struct CreateMaterialRequest {
    /// Picked at random in [1, 5] when absent.
    #[validate(range(min = 1, max = 5))]
    pub difficulty: Option<u8>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct CompleteMaterialRequest {
    #[validate(length(min = 1, max = 64))]
    pub material_id: MaterialId,
}

// --- Materials ---

#[update]
async fn list_materials() -> Result<Vec<Material>, MaterialError> {
    repository()?.list_all().await
}

#[update]
async fn list_my_materials() -> Result<Vec<Material>, MaterialError> {
    let owner = check_wallet_connected(caller())?;
    repository()?.list_owned_by(&owner).await
}

#[update]
async fn create_material(req: CreateMaterialRequest) -> Result<Material, MaterialError> {
    let principal = caller();
    let owner = check_wallet_connected(principal)?;
    validate_request(&req)?;
    session_for(principal)?.generate(&owner, req.difficulty).await
}

#[update]
async fn complete_material(req: CompleteMaterialRequest) -> Result<Material, MaterialError> {
    let principal = caller();
    check_wallet_connected(principal)?;
    validate_request(&req)?;
    session_for(principal)?.complete(&req.material_id).await
}

#[update]
async fn check_availability() -> Result<bool, MaterialError> {
    session_for(caller())?.check_availability().await
}

#[update]
async fn get_material_stats() -> Result<MaterialStats, MaterialError> {
    Ok(compute_stats(&repository()?.list_all().await?))
}

/// Tears down the caller's session, cancelling its pending timers.
#[update]
fn end_session() -> bool {
    let principal = caller();
    match SESSIONS.with(|s| s.borrow_mut().remove(&principal)) {
        Some(session) => {
            session.teardown();
            true
        }
        None => false,
    }
}

#[query]
fn get_transaction_status() -> Option<TransactionStatus> {
    let principal = caller();
    SESSIONS.with(|s| s.borrow().get(&principal).and_then(|session| session.transaction_status()))
}

// --- Admin ---

#[update]
async fn reconcile_index() -> Result<ReconcileReport, MaterialError> {
    admin_guard()?;
    repository()?.reconcile().await
}

/// Pauses or resumes the local store. The flag survives upgrades.
#[update]
fn set_store_available(available: bool) -> Result<(), MaterialError> {
    admin_guard()?;
    apply_store_availability(available)
}

#[query]
fn get_metrics() -> MaterialMetrics {
    get_material_metrics()
}

#[query]
fn get_config() -> MaterialConfig {
    get_stored_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv_store::KeyValueStore;
    use tokio_test::block_on;

    #[test]
    fn difficulty_must_be_within_range_when_given() {
        assert!(validate_request(&CreateMaterialRequest { difficulty: None }).is_ok());
        assert!(validate_request(&CreateMaterialRequest { difficulty: Some(5) }).is_ok());
        assert!(matches!(
            validate_request(&CreateMaterialRequest { difficulty: Some(0) }),
            Err(MaterialError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_request(&CreateMaterialRequest { difficulty: Some(6) }),
            Err(MaterialError::InvalidInput(_))
        ));
    }

    #[test]
    fn material_id_must_not_be_empty() {
        let empty = CompleteMaterialRequest { material_id: String::new() };
        assert!(matches!(validate_request(&empty), Err(MaterialError::InvalidInput(_))));
        let id = CompleteMaterialRequest { material_id: "1700000000000-k3j9x0a".to_string() };
        assert!(validate_request(&id).is_ok());
    }

    fn installed_locally() {
        install(&MaterialConfig::default());
    }

    fn session_count() -> usize {
        SESSIONS.with(|s| s.borrow().len())
    }

    #[test]
    fn listing_does_not_open_a_session() {
        installed_locally();
        let listed = block_on(repository().unwrap().list_all()).unwrap();
        assert!(listed.is_empty());
        assert_eq!(session_count(), 0);
    }

    #[test]
    fn idle_sessions_are_evicted_on_next_use() {
        installed_locally();
        let first = Principal::from_slice(&[1]);
        let second = Principal::from_slice(&[2]);

        let held = session_for(first).unwrap();
        drop(session_for(second).unwrap());
        assert_eq!(session_count(), 2);

        // `first` is still held by a caller, `second` is idle and unreferenced.
        evict_idle_sessions();
        assert_eq!(session_count(), 1);
        assert!(SESSIONS.with(|s| s.borrow().contains_key(&first)));

        drop(held);
        drop(session_for(second).unwrap());
        assert_eq!(session_count(), 1);
        assert!(SESSIONS.with(|s| s.borrow().contains_key(&second)));
    }

    #[test]
    fn paused_store_survives_reinstall() {
        installed_locally();
        apply_store_availability(false).unwrap();
        assert!(!get_stored_config().local_store_available);

        install(&get_stored_config());
        assert_eq!(block_on(store().unwrap().is_available()), Ok(false));

        apply_store_availability(true).unwrap();
        install(&get_stored_config());
        assert_eq!(block_on(store().unwrap().is_available()), Ok(true));
    }

    #[test]
    fn store_must_be_installed_before_use() {
        STORE.with(|s| *s.borrow_mut() = None);
        assert!(matches!(store(), Err(MaterialError::InternalError(_))));
    }
}
