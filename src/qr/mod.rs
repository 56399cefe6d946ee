//! Scannable Payload Module
//!
//! JSON payloads handed to the hardware signing device through a visual
//! code. The crate only produces the payload text; turning it into an
//! actual image is the embedding UI's job, behind [`PayloadRenderer`].

use serde::{Deserialize, Serialize};

use crate::error::WeblinkResult;

/// Device-registration payload
///
/// Shown when the user links a new hardware device. The device posts its
/// address back to `url`, authenticating with the one-time `token`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterPayload {
    pub action: String,
    pub url: String,
    pub token: String,
}

impl RegisterPayload {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            action: "register".to_string(),
            url: url.into(),
            token: token.into(),
        }
    }
}

/// Transaction-signing payload
///
/// Carries the unsigned RLP for the device to sign and the callback to
/// deliver the signature to. `gas_estimation` is a decimal string so the
/// device can show a human-readable fee figure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignPayload {
    pub action: String,
    pub url: String,
    pub token: String,
    pub signer: String,
    pub serialized: String,
    pub gas_estimation: String,
}

impl SignPayload {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        signer: impl Into<String>,
        serialized: impl Into<String>,
        gas_estimation: impl Into<String>,
    ) -> Self {
        Self {
            action: "sign".to_string(),
            url: url.into(),
            token: token.into(),
            signer: signer.into(),
            serialized: serialized.into(),
            gas_estimation: gas_estimation.into(),
        }
    }
}

/// Serialize a payload to the JSON text the renderer encodes.
pub fn payload_json<T: Serialize>(payload: &T) -> WeblinkResult<String> {
    Ok(serde_json::to_string(payload)?)
}

/// Seam between the core and whatever draws the visual code.
///
/// `render` replaces any payload currently on display; `clear` blanks it.
pub trait PayloadRenderer {
    fn render(&mut self, payload_json: &str);
    fn clear(&mut self);
}

/// Renderer that writes the payload text to the console log stream.
/// Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    current: Option<String>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl PayloadRenderer for ConsoleRenderer {
    fn render(&mut self, payload_json: &str) {
        crate::log_info!("qr", "Displaying payload", len = payload_json.len());
        self.current = Some(payload_json.to_string());
    }

    fn clear(&mut self) {
        if self.current.take().is_some() {
            crate::log_debug!("qr", "Payload cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_payload_keys() {
        let payload = RegisterPayload::new("https://host/account-add-hw", "tok-1");
        let json: serde_json::Value =
            serde_json::from_str(&payload_json(&payload).unwrap()).unwrap();

        assert_eq!(json["action"], "register");
        assert_eq!(json["url"], "https://host/account-add-hw");
        assert_eq!(json["token"], "tok-1");
    }

    #[test]
    fn test_sign_payload_keys() {
        let payload = SignPayload::new(
            "https://host/account-transact-sign",
            "tok-2",
            "0xabc",
            "0xdeadbeef",
            "21000",
        );
        let json: serde_json::Value =
            serde_json::from_str(&payload_json(&payload).unwrap()).unwrap();

        assert_eq!(json["action"], "sign");
        assert_eq!(json["signer"], "0xabc");
        assert_eq!(json["serialized"], "0xdeadbeef");
        // camelCase on the wire
        assert_eq!(json["gasEstimation"], "21000");
        assert!(json.get("gas_estimation").is_none());
    }

    #[test]
    fn test_console_renderer_replaces_and_clears() {
        let mut renderer = ConsoleRenderer::new();
        renderer.render("{\"a\":1}");
        renderer.render("{\"a\":2}");
        assert_eq!(renderer.current(), Some("{\"a\":2}"));

        renderer.clear();
        assert_eq!(renderer.current(), None);
    }
}
