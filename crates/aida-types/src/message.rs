use alloy::primitives::{Address, B256, U256};

/// One address/slot pair from an access list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

/// EIP-7702 set-code authorization tuple.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetCodeAuthorization {
    pub chain_id: U256,
    pub address: Address,
    pub nonce: u64,
    pub y_parity: u8,
    pub r: U256,
    pub s: U256,
}

/// The transaction message evaluated against a state view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub sender: Address,
    pub to: Option<Address>,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub gas_fee_cap: Option<U256>,
    pub gas_tip_cap: Option<U256>,
    pub data: Vec<u8>,
    pub access_list: Vec<AccessListEntry>,
    pub blob_hashes: Vec<B256>,
    pub blob_gas_fee_cap: Option<U256>,
    pub set_code_authorizations: Vec<SetCodeAuthorization>,
    /// When set, the processor must not reject the message for a stale/mismatched nonce.
    pub skip_nonce_checks: bool,
}

impl Message {
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}
