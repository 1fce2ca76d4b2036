// src/backend/adapter/kv_contract_adapter.rs
// Key/value store reached through inter-canister calls to the storage contract

use crate::error::MaterialError;
use crate::storage::kv_store::KeyValueStore;
use async_trait::async_trait;
use candid::Principal;
use ic_cdk::api::call::RejectionCode;

const IS_AVAILABLE_METHOD: &str = "isAvailable";
const GET_DATA_METHOD: &str = "getData";
const SET_DATA_METHOD: &str = "setData";

/// Client of a contract exposing `isAvailable`, `getData` and `setData`.
///
/// Every `setData` is a signed transaction on the contract side; a reject by
/// the contract itself is how a declined signature surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractKvStore {
    contract: Principal,
}

impl ContractKvStore {
    pub fn new(contract: Principal) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> Principal {
        self.contract
    }
}

fn map_rejection(method: &str, code: RejectionCode, msg: String) -> MaterialError {
    match code {
        RejectionCode::CanisterReject => MaterialError::UserRejected(format!("{} rejected: {}", method, msg)),
        other => MaterialError::StoreUnavailable(format!("{} failed: {:?} - {}", method, other, msg)),
    }
}

#[async_trait(?Send)]
impl KeyValueStore for ContractKvStore {
    async fn is_available(&self) -> Result<bool, MaterialError> {
        let (available,): (bool,) = ic_cdk::call(self.contract, IS_AVAILABLE_METHOD, ())
            .await
            .map_err(|(code, msg)| {
                tracing::error!("{} on {} failed: {:?} - {}", IS_AVAILABLE_METHOD, self.contract, code, msg);
                MaterialError::StoreUnavailable(format!("{} failed: {:?} - {}", IS_AVAILABLE_METHOD, code, msg))
            })?;
        Ok(available)
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, MaterialError> {
        let (bytes,): (Vec<u8>,) = ic_cdk::call(self.contract, GET_DATA_METHOD, (key.to_string(),))
            .await
            .map_err(|(code, msg)| {
                tracing::error!("{}({}) on {} failed: {:?} - {}", GET_DATA_METHOD, key, self.contract, code, msg);
                map_rejection(GET_DATA_METHOD, code, msg)
            })?;
        Ok(bytes)
    }

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<(), MaterialError> {
        tracing::debug!("{}({}, {} bytes) on {}", SET_DATA_METHOD, key, value.len(), self.contract);
        ic_cdk::call::<_, ()>(self.contract, SET_DATA_METHOD, (key.to_string(), value))
            .await
            .map_err(|(code, msg)| {
                tracing::error!("{}({}) on {} failed: {:?} - {}", SET_DATA_METHOD, key, self.contract, code, msg);
                map_rejection(SET_DATA_METHOD, code, msg)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_rejects_surface_as_user_rejections() {
        assert!(matches!(
            map_rejection(SET_DATA_METHOD, RejectionCode::CanisterReject, "denied".to_string()),
            MaterialError::UserRejected(_)
        ));
        assert!(matches!(
            map_rejection(GET_DATA_METHOD, RejectionCode::SysTransient, "busy".to_string()),
            MaterialError::StoreUnavailable(_)
        ));
    }
}
