//! Push Reconciliation Listener
//!
//! Decodes frames arriving on the private per-user channel and turns
//! them into typed events. Anything that does not decode is dropped
//! silently; push input is untrusted and must never wedge the session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Name of the private per-user channel the backend publishes on.
pub use crate::config::PRIVATE_CHANNEL;

/// Inner event carried inside the push envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushEvent {
    /// Free-text line for the on-page console
    #[serde(rename = "console")]
    Console { data: String },

    /// A hardware device completed registration
    #[serde(rename = "add-hw-resp")]
    DeviceRegistered { address: String, balance: String },

    /// The device signed and the backend broadcast the transaction
    #[serde(rename = "transact-sign-resp")]
    TransactionSigned {
        #[serde(rename = "transactionHash")]
        transaction_hash: String,
    },
}

#[derive(Debug, Deserialize)]
struct PushFrame {
    data: serde_json::Value,
}

/// Decode a raw frame. Returns `None` for anything malformed or of an
/// unknown type; the caller drops those without logging an error.
pub fn decode(raw: &str) -> Option<PushEvent> {
    let frame: PushFrame = serde_json::from_str(raw).ok()?;
    match serde_json::from_value(frame.data) {
        Ok(event) => Some(event),
        Err(_) => {
            crate::log_debug!("push", "Dropping unrecognized push frame");
            None
        }
    }
}

/// Seam over the concrete push transport (the embedding UI owns the
/// actual socket). `poll` yields raw frames; `None` means no frame is
/// currently available.
pub trait PushChannel {
    fn subscribe(&mut self, channel: &str) -> crate::error::WeblinkResult<()>;
    fn poll(&mut self) -> crate::error::WeblinkResult<Option<String>>;
}

const RECONNECT_BASE_MS: u64 = 500;
const RECONNECT_CAP_MS: u64 = 30_000;

/// Capped exponential backoff delay for an embedding UI that chooses to
/// re-subscribe after a channel failure. The core never reconnects on
/// its own.
pub fn reconnect_delay(attempt: u32) -> Duration {
    let exp = attempt.min(16);
    let ms = RECONNECT_BASE_MS.saturating_mul(1u64 << exp);
    Duration::from_millis(ms.min(RECONNECT_CAP_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_console_event() {
        let raw = r#"{"data":{"type":"console","data":"device connected"}}"#;
        assert_eq!(
            decode(raw),
            Some(PushEvent::Console {
                data: "device connected".to_string()
            })
        );
    }

    #[test]
    fn test_decode_device_registered() {
        let raw = r#"{"data":{"type":"add-hw-resp","address":"0xabc","balance":"0xde0b6b3a7640000"}}"#;
        let event = decode(raw).unwrap();
        assert_eq!(
            event,
            PushEvent::DeviceRegistered {
                address: "0xabc".to_string(),
                balance: "0xde0b6b3a7640000".to_string()
            }
        );
    }

    #[test]
    fn test_decode_transaction_signed_uses_camel_case_hash() {
        let raw = r#"{"data":{"type":"transact-sign-resp","transactionHash":"0xfeed"}}"#;
        let event = decode(raw).unwrap();
        assert_eq!(
            event,
            PushEvent::TransactionSigned {
                transaction_hash: "0xfeed".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_frames_dropped_silently() {
        assert_eq!(decode("{not json"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode(r#"{"other":1}"#), None);
        assert_eq!(decode(r#"{"data":{"type":"mystery","x":1}}"#), None);
        assert_eq!(decode(r#"{"data":{"type":"add-hw-resp"}}"#), None);
    }

    #[test]
    fn test_reconnect_delay_caps() {
        assert_eq!(reconnect_delay(0), Duration::from_millis(500));
        assert_eq!(reconnect_delay(1), Duration::from_millis(1000));
        assert_eq!(reconnect_delay(10), Duration::from_millis(30_000));
        assert_eq!(reconnect_delay(u32::MAX), Duration::from_millis(30_000));
    }
}
