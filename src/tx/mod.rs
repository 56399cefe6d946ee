//! Transaction Module
//!
//! Builds canonical unsigned transactions for out-of-band signing.

mod builder;

pub use builder::{build_unsigned_transaction, keccak256, TransferParams};
