//! Signing Handshake Coordinator
//!
//! Tracks the out-of-band exchanges with the hardware device: device
//! registration and transaction signing. Each kind has at most one
//! pending handshake; starting a new one supersedes the displayed
//! payload of the old one, but the backend-side token of the old
//! handshake is not cancelled and a late device response to it will be
//! ignored here.

use chrono::{DateTime, Utc};
use ethers_core::types::U256;

use crate::accounts::AccountStore;
use crate::amounts::parse_hex_quantity;
use crate::api::{self, Transport};
use crate::config::Settings;
use crate::error::WeblinkResult;
use crate::push::PushEvent;
use crate::qr::{payload_json, PayloadRenderer, RegisterPayload, SignPayload};
use crate::types::{Account, UnsignedTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeKind {
    RegisterDevice,
    SignTransaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Token received from the backend, payload not yet on display
    Requested,
    /// Payload on display, waiting for the device to respond
    AwaitingDevice,
    /// Device responded and the result was applied
    Resolved,
    /// Backend rejected the request
    Failed,
    /// Superseded or expired before the device responded
    Abandoned,
}

#[derive(Debug, Clone)]
pub struct Handshake {
    pub token: String,
    pub kind: HandshakeKind,
    pub created_at: DateTime<Utc>,
    pub state: HandshakeState,
}

impl Handshake {
    fn new(token: String, kind: HandshakeKind) -> Self {
        Self {
            token,
            kind,
            created_at: Utc::now(),
            state: HandshakeState::Requested,
        }
    }

    fn is_awaiting(&self) -> bool {
        self.state == HandshakeState::AwaitingDevice
    }
}

/// Outcome of feeding a push event to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A device completed registration; the account was stored
    DeviceLinked(Account),
    /// The transaction was signed and broadcast
    TransactionConfirmed(String),
    /// Event did not match a pending handshake
    Ignored,
}

pub struct Coordinator {
    settings: Settings,
    link_renderer: Box<dyn PayloadRenderer>,
    sign_renderer: Box<dyn PayloadRenderer>,
    pending_link: Option<Handshake>,
    pending_sign: Option<Handshake>,
}

impl Coordinator {
    pub fn new(
        settings: Settings,
        link_renderer: Box<dyn PayloadRenderer>,
        sign_renderer: Box<dyn PayloadRenderer>,
    ) -> Self {
        Self {
            settings,
            link_renderer,
            sign_renderer,
            pending_link: None,
            pending_sign: None,
        }
    }

    pub fn pending_link(&self) -> Option<&Handshake> {
        self.pending_link.as_ref()
    }

    pub fn pending_sign(&self) -> Option<&Handshake> {
        self.pending_sign.as_ref()
    }

    /// Start a device-link handshake. Any handshake of the same kind
    /// still awaiting the device is abandoned and its payload cleared.
    pub fn request_device_link(&mut self, transport: &dyn Transport) -> WeblinkResult<()> {
        abandon_pending(&mut self.pending_link, self.link_renderer.as_mut());

        let response = api::link_token(transport).map_err(|e| {
            crate::log_error!("handshake", "Device-link token request failed", error = e);
            e
        })?;

        let payload =
            RegisterPayload::new(self.settings.register_callback_url(), &response.token);
        let payload = payload_json(&payload)?;

        let mut handshake = Handshake::new(response.token, HandshakeKind::RegisterDevice);
        self.link_renderer.render(&payload);
        handshake.state = HandshakeState::AwaitingDevice;

        crate::log_info!("handshake", "Device-link handshake awaiting device");
        self.pending_link = Some(handshake);
        Ok(())
    }

    /// Start a signing handshake for an already-built unsigned
    /// transaction. `estimated_gas` rides along for the device display.
    pub fn request_transaction_signing(
        &mut self,
        transport: &dyn Transport,
        unsigned: &UnsignedTransaction,
        estimated_gas: U256,
    ) -> WeblinkResult<()> {
        abandon_pending(&mut self.pending_sign, self.sign_renderer.as_mut());

        let response = api::submit_transaction(transport, unsigned).map_err(|e| {
            crate::log_error!("handshake", "Transaction submission failed", error = e);
            e
        })?;

        let payload = SignPayload::new(
            self.settings.sign_callback_url(),
            &response.token,
            &response.signer_addr,
            &unsigned.serialized,
            estimated_gas.to_string(),
        );
        let payload = payload_json(&payload)?;

        let mut handshake = Handshake::new(response.token, HandshakeKind::SignTransaction);
        self.sign_renderer.render(&payload);
        handshake.state = HandshakeState::AwaitingDevice;

        crate::log_info!("handshake", "Signing handshake awaiting device");
        self.pending_sign = Some(handshake);
        Ok(())
    }

    /// Apply a push event to the pending handshakes. Events that do not
    /// match a handshake still awaiting the device are ignored.
    pub fn resolve(&mut self, event: &PushEvent, store: &mut AccountStore) -> Resolution {
        match event {
            PushEvent::DeviceRegistered { address, balance } => {
                match self.pending_link.as_mut() {
                    Some(handshake) if handshake.is_awaiting() => {
                        let balance_wei = match parse_hex_quantity(balance) {
                            Ok(value) => value,
                            Err(_) => {
                                crate::log_warn!(
                                    "handshake",
                                    "Registration carried unparseable balance, ignoring event"
                                );
                                return Resolution::Ignored;
                            }
                        };

                        handshake.state = HandshakeState::Resolved;
                        self.link_renderer.clear();
                        store.upsert(address.clone(), balance_wei);

                        Resolution::DeviceLinked(Account {
                            address: address.clone(),
                            balance_wei,
                        })
                    }
                    _ => Resolution::Ignored,
                }
            }
            PushEvent::TransactionSigned { transaction_hash } => {
                match self.pending_sign.as_mut() {
                    Some(handshake) if handshake.is_awaiting() => {
                        handshake.state = HandshakeState::Resolved;
                        self.sign_renderer.clear();
                        Resolution::TransactionConfirmed(transaction_hash.clone())
                    }
                    _ => Resolution::Ignored,
                }
            }
            PushEvent::Console { .. } => Resolution::Ignored,
        }
    }

    /// Abandon handshakes that have been awaiting the device longer than
    /// `ttl`. Nothing calls this implicitly; the embedding UI decides.
    pub fn abandon_stale(&mut self, ttl: std::time::Duration) {
        let ttl = match chrono::Duration::from_std(ttl) {
            Ok(ttl) => ttl,
            Err(_) => return, // TTL beyond representable range, nothing can be stale
        };
        let cutoff = match Utc::now().checked_sub_signed(ttl) {
            Some(cutoff) => cutoff,
            None => return,
        };

        if matches!(&self.pending_link, Some(h) if h.is_awaiting() && h.created_at < cutoff) {
            abandon_pending(&mut self.pending_link, self.link_renderer.as_mut());
        }
        if matches!(&self.pending_sign, Some(h) if h.is_awaiting() && h.created_at < cutoff) {
            abandon_pending(&mut self.pending_sign, self.sign_renderer.as_mut());
        }
    }

    /// Drop all pending handshakes and blank both displays.
    pub fn reset(&mut self) {
        abandon_pending(&mut self.pending_link, self.link_renderer.as_mut());
        abandon_pending(&mut self.pending_sign, self.sign_renderer.as_mut());
    }
}

fn abandon_pending(slot: &mut Option<Handshake>, renderer: &mut dyn PayloadRenderer) {
    if let Some(handshake) = slot.as_mut() {
        if handshake.is_awaiting() {
            handshake.state = HandshakeState::Abandoned;
            crate::log_debug!("handshake", "Superseding pending handshake");
        }
    }
    renderer.clear();
}
