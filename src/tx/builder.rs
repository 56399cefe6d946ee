//! Unsigned Transaction Builder
//!
//! Assembles the canonical legacy (EIP-155) transaction from validated
//! transfer parameters plus the sender's next nonce, and derives its
//! signing hash and unsigned RLP serialization. Pure: identical inputs
//! produce byte-identical output.

use crate::error::{WeblinkError, WeblinkResult};
use crate::types::UnsignedTransaction;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, TransactionRequest, U256};
use std::str::FromStr;

/// Validated transfer parameters, all in base units
#[derive(Debug, Clone)]
pub struct TransferParams {
    pub from: String,
    pub to: String,
    pub value_wei: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
}

/// Build the canonical unsigned transaction.
///
/// `content_hash` is the EIP-155 signing hash; `serialized` is the
/// unsigned RLP preimage the signing device consumes. Gas and value
/// fields are carried exactly, never rounded.
pub fn build_unsigned_transaction(
    params: &TransferParams,
    nonce: U256,
    chain_id: u64,
) -> WeblinkResult<UnsignedTransaction> {
    let to = Address::from_str(&params.to)
        .map_err(|e| WeblinkError::invalid_address(format!("Invalid recipient '{}': {}", params.to, e)))?;
    let from = Address::from_str(&params.from)
        .map_err(|e| WeblinkError::invalid_address(format!("Invalid sender '{}': {}", params.from, e)))?;

    let request = TransactionRequest::new()
        .from(from)
        .to(to)
        .value(params.value_wei)
        .gas(params.gas_limit)
        .gas_price(params.gas_price)
        .nonce(nonce)
        .chain_id(chain_id);

    let typed: TypedTransaction = request.into();
    let sighash = typed.sighash();
    let rlp = typed.rlp();

    Ok(UnsignedTransaction {
        nonce,
        gas_price: params.gas_price,
        gas_limit: params.gas_limit,
        to: params.to.clone(),
        value: params.value_wei,
        from: params.from.clone(),
        content_hash: format!("0x{}", hex::encode(sighash.as_bytes())),
        serialized: format!("0x{}", hex::encode(&rlp)),
    })
}

/// Raw keccak-256
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    use tiny_keccak::{Hasher, Keccak};

    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);
    hash
}
