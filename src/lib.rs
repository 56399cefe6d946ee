//! weblink-core
//!
//! Client core of a web dashboard that manages Ethereum accounts and has
//! transactions signed by a physically separate hardware device. The
//! device is reached out-of-band through a scannable JSON payload; its
//! results come back over a private per-user push channel.
//!
//! The crate holds no keys and performs no signing. It validates
//! transfers, builds canonical unsigned transactions, coordinates the
//! signing handshakes and reconciles push events into the account store.

pub mod accounts;
pub mod amounts;
pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod handshake;
pub mod push;
pub mod qr;
pub mod session;
pub mod tx;
pub mod types;
pub mod utils;

pub use accounts::AccountStore;
pub use amounts::{format_ether, parse_ether, parse_hex_quantity, validate_transfer, FeeQuote, TransferDecision};
pub use api::{HttpTransport, Transport};
pub use config::Settings;
pub use error::{ErrorCode, WeblinkError, WeblinkResult};
pub use handshake::{Coordinator, Handshake, HandshakeKind, HandshakeState, Resolution};
pub use push::{decode as decode_push, PushChannel, PushEvent};
pub use qr::{ConsoleRenderer, PayloadRenderer, RegisterPayload, SignPayload};
pub use session::{ConsoleLog, DashboardSession, TransferOutcome};
pub use tx::{build_unsigned_transaction, keccak256, TransferParams};
pub use types::{Account, TransferRequest, UnsignedTransaction};
