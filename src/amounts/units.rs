//! Wei/Ether Unit Conversion
//!
//! All arithmetic in this crate happens on integer wei magnitudes; these
//! helpers convert at the input/output boundaries. Conversion is lossless
//! for integral wei values.

use crate::error::{WeblinkError, WeblinkResult};
use ethers_core::types::U256;

/// Decimal places between wei and ether
pub const ETHER_DECIMALS: u32 = 18;

/// The fixed network-wide scale factor (10^18)
pub fn wei_per_ether() -> U256 {
    U256::exp10(ETHER_DECIMALS as usize)
}

/// Parse a 0x-prefixed (or bare) hex quantity into wei
pub fn parse_hex_quantity(quantity: &str) -> WeblinkResult<U256> {
    let trimmed = quantity.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(WeblinkError::parse_error("Empty hex quantity"));
    }

    U256::from_str_radix(digits, 16)
        .map_err(|e| WeblinkError::parse_error(format!("Invalid hex quantity '{}': {}", quantity, e)))
}

/// Parse a user-entered decimal ether string into wei
///
/// Accepts an optional fractional part of up to 18 digits. Negative or
/// malformed input is rejected.
pub fn parse_ether(amount: &str) -> WeblinkResult<U256> {
    let trimmed = amount.trim();

    if trimmed.is_empty() {
        return Err(WeblinkError::invalid_amount("Amount is empty"));
    }
    if trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(WeblinkError::invalid_amount(format!(
            "Amount '{}' must be an unsigned decimal",
            trimmed
        )));
    }

    let (integer_str, fraction_str) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    if integer_str.is_empty() && fraction_str.is_empty() {
        return Err(WeblinkError::invalid_amount("Amount has no digits"));
    }
    if !integer_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(WeblinkError::invalid_amount(format!(
            "Amount '{}' is not a decimal number",
            trimmed
        )));
    }
    if fraction_str.len() > ETHER_DECIMALS as usize {
        return Err(WeblinkError::invalid_amount(format!(
            "Amount '{}' has more than {} decimal places",
            trimmed, ETHER_DECIMALS
        )));
    }

    let integer = if integer_str.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(integer_str)
            .map_err(|e| WeblinkError::invalid_amount(format!("Invalid amount '{}': {}", trimmed, e)))?
    };

    // Pad the fractional part to full wei precision
    let padded = format!("{:0<width$}", fraction_str, width = ETHER_DECIMALS as usize);
    let fraction = if fraction_str.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&padded)
            .map_err(|e| WeblinkError::invalid_amount(format!("Invalid amount '{}': {}", trimmed, e)))?
    };

    integer
        .checked_mul(wei_per_ether())
        .and_then(|v| v.checked_add(fraction))
        .ok_or_else(|| WeblinkError::invalid_amount(format!("Amount '{}' overflows", trimmed)))
}

/// Format a wei magnitude as a display-unit ether string
///
/// Trailing fractional zeros are trimmed; integral values render with no
/// fractional part at all.
pub fn format_ether(wei: U256) -> String {
    let scale = wei_per_ether();
    let integer = wei / scale;
    let fraction = wei % scale;

    if fraction.is_zero() {
        integer.to_string()
    } else {
        let frac_str = format!(
            "{:0>width$}",
            fraction.to_string(),
            width = ETHER_DECIMALS as usize
        );
        format!("{}.{}", integer, frac_str.trim_end_matches('0'))
    }
}
