//! Shared types for weblink-core
//!
//! All data structures that cross module boundaries are defined here
//! for consistent serialization against the backend JSON.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

// =============================================================================
// Response Envelope
// =============================================================================

/// Backend response status discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "ko")]
    Ko,
}

/// Envelope carried by every backend response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub status: ApiStatus,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ApiEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == ApiStatus::Ok
    }
}

// =============================================================================
// Domain Types
// =============================================================================

/// A known account: unique address plus its last observed balance in wei.
///
/// Owned exclusively by the account store; everything else reads snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub balance_wei: U256,
}

/// A user-supplied transfer, prior to validation.
///
/// `amount_ether` is the display-unit decimal string exactly as entered;
/// conversion to wei happens at the validation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount_ether: String,
    pub gas_limit: u64,
}

/// A canonical unsigned transaction, ready for out-of-band signing.
///
/// `content_hash` and `serialized` are pure functions of the other fields
/// plus the configured chain id. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: String,
    pub value: U256,
    pub from: String,
    /// Keccak-256 signing hash, 0x-prefixed hex
    pub content_hash: String,
    /// Unsigned RLP encoding (EIP-155 preimage), 0x-prefixed hex
    pub serialized: String,
}

// =============================================================================
// Wire Types
// =============================================================================

/// Account entry as returned by `account-add` / `account-refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAccount {
    pub address: String,
    /// Balance in wei as a hex quantity
    pub balance: String,
}

/// `account-refresh` response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAccountList {
    #[serde(default)]
    pub accounts: Vec<WireAccount>,
}

/// `account-info` response data; all quantities are 0x-prefixed hex
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAccountInfo {
    pub balance: String,
    pub gas_price: String,
    pub estimated_gas: String,
    pub transaction_count: String,
}

/// `account-add-hw-req` response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTokenResponse {
    pub token: String,
}

/// `account-transact` response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactResponse {
    pub token: String,
    pub signer_addr: String,
}

/// `account-transact` request body: the unsigned transaction in wire form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactRequest {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: String,
    pub value: U256,
    pub from: String,
    pub hash: String,
    pub serialized: String,
}

impl From<&UnsignedTransaction> for TransactRequest {
    fn from(tx: &UnsignedTransaction) -> Self {
        Self {
            nonce: tx.nonce,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            to: tx.to.clone(),
            value: tx.value,
            from: tx.from.clone(),
            hash: tx.content_hash.clone(),
            serialized: tx.serialized.clone(),
        }
    }
}
