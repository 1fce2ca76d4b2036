// src/backend/utils/guards.rs
use crate::error::MaterialError;
use crate::models::common::OwnerId;
use candid::Principal;

/// Checks that the caller is an authenticated wallet and returns its owner id.
///
/// # Errors
///
/// Returns `MaterialError::NotAuthorized` for the anonymous principal.
pub fn check_wallet_connected(caller: Principal) -> Result<OwnerId, MaterialError> {
    if caller == Principal::anonymous() {
        Err(MaterialError::NotAuthorized("Please connect wallet first".to_string()))
    } else {
        Ok(caller.to_text())
    }
}

/// Checks if the caller is the configured admin principal.
pub fn check_admin(caller: Principal, admin: Principal) -> Result<(), MaterialError> {
    if caller == admin && caller != Principal::anonymous() {
        Ok(())
    } else {
        Err(MaterialError::NotAuthorized(format!("Caller {} is not the admin", caller)))
    }
}
