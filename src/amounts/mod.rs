//! Amount Engine
//!
//! Computes fees, the maximum transferable amount and the total deduction
//! for a proposed transfer, and validates the transfer against the live
//! account figures. All arithmetic is on integer wei magnitudes; display
//! conversion happens only at the edges (see `units`).

mod units;

pub use units::{format_ether, parse_ether, parse_hex_quantity, wei_per_ether, ETHER_DECIMALS};

use crate::error::{WeblinkError, WeblinkResult};
use ethers_core::types::U256;

/// Fee figures derived from live account info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub gas_price: U256,
    pub estimated_gas: U256,
    /// gas_price * estimated_gas
    pub fee: U256,
}

impl FeeQuote {
    pub fn new(gas_price: U256, estimated_gas: U256) -> WeblinkResult<Self> {
        let fee = gas_price
            .checked_mul(estimated_gas)
            .ok_or_else(|| WeblinkError::invalid_amount("Fee computation overflows"))?;
        Ok(Self {
            gas_price,
            estimated_gas,
            fee,
        })
    }
}

/// Maximum transferable amount: balance minus fee, or `None` when the fee
/// alone exceeds the balance (no transfer is possible).
pub fn max_transferable(balance: U256, fee: U256) -> Option<U256> {
    balance.checked_sub(fee)
}

/// Outcome of validating a proposed transfer, in spec evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferDecision {
    /// Proceed to building the transaction
    Accepted {
        value_wei: U256,
        fee: FeeQuote,
        max_transferable: U256,
    },
    /// The user-chosen gas limit is below the network estimate
    GasBelowEstimate { estimated_gas: U256 },
    /// Transfer plus fee exceeds the available balance
    InsufficientBalance {
        transfer_wei: U256,
        fee_wei: U256,
        balance_wei: U256,
        /// Conceptually clamped at zero
        max_transferable_wei: U256,
    },
}

impl TransferDecision {
    /// Alert text for a rejection, with every figure in display units.
    /// `None` for an accepted transfer.
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            TransferDecision::Accepted { .. } => None,
            TransferDecision::GasBelowEstimate { estimated_gas } => Some(format!(
                "gasLimit is less than estimated amount: {}",
                estimated_gas
            )),
            TransferDecision::InsufficientBalance {
                transfer_wei,
                fee_wei,
                balance_wei,
                max_transferable_wei,
            } => Some(format!(
                "Transfer amount {} Ether + estimated transaction fee {} Ether \
                 exceeded available balance of {} Ether\n\
                 Maximum allowable transfer is {} Ether",
                format_ether(*transfer_wei),
                format_ether(*fee_wei),
                format_ether(*balance_wei),
                format_ether(*max_transferable_wei),
            )),
        }
    }

    /// Rejection as a typed error, for surfaces that report through
    /// `WeblinkError` instead of raw alert text. `None` for an accepted
    /// transfer.
    pub fn rejection_error(&self) -> Option<WeblinkError> {
        let message = self.rejection_message()?;
        match self {
            TransferDecision::Accepted { .. } => None,
            TransferDecision::GasBelowEstimate { .. } => {
                Some(WeblinkError::gas_below_estimate(message))
            }
            TransferDecision::InsufficientBalance { .. } => {
                Some(WeblinkError::insufficient_funds(message))
            }
        }
    }
}

/// Validate a proposed transfer against live account figures.
///
/// Policy, evaluated in order:
/// 1. reject when `gas_limit < estimated_gas`;
/// 2. reject when `balance < fee + transfer`;
/// 3. accept otherwise.
///
/// `amount_ether` is the user-entered display-unit string; everything else
/// is already in base units. Malformed amounts are an input error, not a
/// decision.
pub fn validate_transfer(
    balance: U256,
    gas_price: U256,
    estimated_gas: U256,
    gas_limit: U256,
    amount_ether: &str,
) -> WeblinkResult<TransferDecision> {
    let value_wei = parse_ether(amount_ether)?;
    let fee = FeeQuote::new(gas_price, estimated_gas)?;

    if gas_limit < estimated_gas {
        return Ok(TransferDecision::GasBelowEstimate { estimated_gas });
    }

    let total_deduction = fee
        .fee
        .checked_add(value_wei)
        .ok_or_else(|| WeblinkError::invalid_amount("Total deduction overflows"))?;

    if balance < total_deduction {
        return Ok(TransferDecision::InsufficientBalance {
            transfer_wei: value_wei,
            fee_wei: fee.fee,
            balance_wei: balance,
            max_transferable_wei: max_transferable(balance, fee.fee).unwrap_or_default(),
        });
    }

    let max = max_transferable(balance, fee.fee).unwrap_or_default();

    Ok(TransferDecision::Accepted {
        value_wei,
        fee,
        max_transferable: max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * wei_per_ether()
    }

    #[test]
    fn test_fee_quote() {
        let quote = FeeQuote::new(U256::from(2u64), U256::from(21_000u64)).unwrap();
        assert_eq!(quote.fee, U256::from(42_000u64));
    }

    #[test]
    fn test_fee_overflow_rejected() {
        assert!(FeeQuote::new(U256::MAX, U256::from(2u64)).is_err());
    }

    #[test]
    fn test_max_transferable() {
        assert_eq!(
            max_transferable(ether(10), ether(1)),
            Some(ether(9))
        );
        assert_eq!(max_transferable(ether(1), ether(2)), None);
    }

    // Spec scenario: balance 10 ETH, fee 1 ETH, transfer 8 -> accepted, max 9
    #[test]
    fn test_scenario_accepted() {
        let decision = validate_transfer(
            ether(10),
            wei_per_ether(), // gas price such that fee = 1 ether
            U256::one(),
            U256::from(21_000u64),
            "8",
        )
        .unwrap();

        match decision {
            TransferDecision::Accepted {
                value_wei,
                fee,
                max_transferable,
            } => {
                assert_eq!(value_wei, ether(8));
                assert_eq!(fee.fee, ether(1));
                assert_eq!(max_transferable, ether(9));
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    // Spec scenario: transfer 9.5 -> rejected with figures 9.5 / 1 / 10 / 9
    #[test]
    fn test_scenario_insufficient_balance() {
        let decision = validate_transfer(
            ether(10),
            wei_per_ether(),
            U256::one(),
            U256::from(21_000u64),
            "9.5",
        )
        .unwrap();

        let message = decision.rejection_message().expect("must be rejected");
        assert!(message.contains("9.5"));
        assert!(message.contains("fee 1 Ether"));
        assert!(message.contains("balance of 10 Ether"));
        assert!(message.contains("transfer is 9 Ether"));
    }

    #[test]
    fn test_gas_limit_below_estimate_checked_first() {
        // Balance is also insufficient, but the gas check wins
        let decision = validate_transfer(
            U256::zero(),
            U256::from(1_000_000_000u64),
            U256::from(21_000u64),
            U256::from(20_000u64),
            "1",
        )
        .unwrap();

        match &decision {
            TransferDecision::GasBelowEstimate { estimated_gas } => {
                assert_eq!(*estimated_gas, U256::from(21_000u64));
            }
            other => panic!("expected gas rejection, got {:?}", other),
        }
        assert!(decision
            .rejection_message()
            .unwrap()
            .contains("21000"));
    }

    #[test]
    fn test_rejection_error_codes() {
        use crate::error::ErrorCode;

        let insufficient = validate_transfer(
            ether(10),
            wei_per_ether(),
            U256::one(),
            U256::from(21_000u64),
            "9.5",
        )
        .unwrap();
        let err = insufficient.rejection_error().unwrap();
        assert_eq!(err.code, ErrorCode::InsufficientFunds);
        assert_eq!(Some(err.message), insufficient.rejection_message());

        let gas = validate_transfer(
            ether(10),
            U256::one(),
            U256::from(21_000u64),
            U256::from(20_000u64),
            "1",
        )
        .unwrap();
        assert_eq!(
            gas.rejection_error().unwrap().code,
            ErrorCode::GasBelowEstimate
        );

        let accepted = validate_transfer(
            ether(10),
            U256::one(),
            U256::one(),
            U256::one(),
            "1",
        )
        .unwrap();
        assert!(accepted.rejection_error().is_none());
    }

    #[test]
    fn test_exact_balance_accepted() {
        // balance == fee + transfer is allowed
        let decision = validate_transfer(
            ether(10),
            wei_per_ether(),
            U256::one(),
            U256::one(),
            "9",
        )
        .unwrap();
        assert!(matches!(decision, TransferDecision::Accepted { .. }));
    }

    #[test]
    fn test_fee_exceeding_balance_reports_zero_max() {
        let decision = validate_transfer(
            ether(1),
            ether(2), // fee alone is 2 ether
            U256::one(),
            U256::one(),
            "0.1",
        )
        .unwrap();

        match decision {
            TransferDecision::InsufficientBalance {
                max_transferable_wei,
                ..
            } => assert_eq!(max_transferable_wei, U256::zero()),
            other => panic!("expected insufficiency, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_amount_is_input_error() {
        assert!(validate_transfer(
            ether(10),
            U256::one(),
            U256::one(),
            U256::one(),
            "nine point five",
        )
        .is_err());
    }
}
