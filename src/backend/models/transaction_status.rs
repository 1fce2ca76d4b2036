// src/backend/models/transaction_status.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum TxPhase {
    Pending,
    Success,
    Error,
}

/// The single transient notification shown to the user.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionStatus {
    pub phase: TxPhase,
    pub message: String,
}

impl TransactionStatus {
    pub fn new(phase: TxPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }
}
