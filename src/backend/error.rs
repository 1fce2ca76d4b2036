// src/backend/error.rs
use crate::models::common::MaterialStatus;
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    /// The key/value contract reported itself unavailable or a call to it failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Bytes read from the store did not decode into the expected JSON shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Material not found: {0}")]
    NotFound(String),

    /// The external signing step was declined.
    #[error("Transaction rejected by user: {0}")]
    UserRejected(String),

    #[error("Invalid transition for material {id}: {from:?} -> {to:?}")]
    InvalidTransition {
        id: String,
        from: MaterialStatus,
        to: MaterialStatus,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal canister error: {0}")]
    InternalError(String),
}
