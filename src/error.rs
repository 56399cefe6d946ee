//! Unified error types for weblink-core
//!
//! All errors flow through this module for consistent handling and
//! serde-safe reporting back to the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all weblink operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeblinkError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl WeblinkError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAmount, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn backend_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendRejected, msg)
    }

    pub fn insufficient_funds(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientFunds, msg)
    }

    pub fn gas_below_estimate(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::GasBelowEstimate, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for WeblinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for WeblinkError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidAddress,
    InvalidAmount,

    // Validation errors (locally recoverable, no retry)
    InsufficientFunds,
    GasBelowEstimate,

    // Transport errors (operation abandoned, user may retry)
    NetworkError,
    Timeout,
    BackendRejected,

    // Parse errors
    ParseError,
    JsonError,
    HexError,

    // Internal
    Internal,
}

/// Result type alias for weblink operations
pub type WeblinkResult<T> = Result<T, WeblinkError>;

// Conversions from common error types

impl From<serde_json::Error> for WeblinkError {
    fn from(e: serde_json::Error) -> Self {
        WeblinkError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for WeblinkError {
    fn from(e: hex::FromHexError) -> Self {
        WeblinkError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for WeblinkError {
    fn from(e: std::io::Error) -> Self {
        WeblinkError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<reqwest::Error> for WeblinkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WeblinkError::new(ErrorCode::Timeout, "Request timed out")
        } else if e.is_connect() {
            WeblinkError::new(ErrorCode::NetworkError, "Connection failed")
        } else {
            WeblinkError::new(ErrorCode::NetworkError, e.to_string())
        }
    }
}

impl From<url::ParseError> for WeblinkError {
    fn from(e: url::ParseError) -> Self {
        WeblinkError::new(ErrorCode::InvalidInput, format!("Invalid URL: {}", e))
    }
}
