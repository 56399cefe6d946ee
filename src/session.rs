//! Session Context
//!
//! One explicit value owning everything the dashboard holds between
//! sign-in and sign-out: the username, the account store, the handshake
//! coordinator, the console log and the last transaction receipt. No
//! module-level mutable state anywhere in the crate.

use ethers_core::types::U256;

use crate::accounts::AccountStore;
use crate::amounts::{self, TransferDecision};
use crate::api::{self, Transport};
use crate::batch::{remove_accounts_sequential, BatchReport};
use crate::config::Settings;
use crate::error::WeblinkResult;
use crate::handshake::{Coordinator, Resolution};
use crate::push::{self, PushChannel, PushEvent, PRIVATE_CHANNEL};
use crate::qr::PayloadRenderer;
use crate::tx::{build_unsigned_transaction, TransferParams};
use crate::types::{TransferRequest, UnsignedTransaction};

/// Append-only console fed by `console` push events, arrival order kept.
#[derive(Debug, Default, Clone)]
pub struct ConsoleLog {
    lines: Vec<String>,
}

impl ConsoleLog {
    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Outcome of a transfer attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Validation failed; carries the decision with its alert message
    Rejected(TransferDecision),
    /// Transaction built and handed to the signing handshake
    SigningRequested(UnsignedTransaction),
}

pub struct DashboardSession {
    settings: Settings,
    username: Option<String>,
    accounts: AccountStore,
    coordinator: Coordinator,
    console: ConsoleLog,
    last_receipt: Option<String>,
}

impl DashboardSession {
    pub fn new(
        settings: Settings,
        link_renderer: Box<dyn PayloadRenderer>,
        sign_renderer: Box<dyn PayloadRenderer>,
    ) -> Self {
        let coordinator = Coordinator::new(settings.clone(), link_renderer, sign_renderer);
        Self {
            settings,
            username: None,
            accounts: AccountStore::new(),
            coordinator,
            console: ConsoleLog::default(),
            last_receipt: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn last_receipt(&self) -> Option<&str> {
        self.last_receipt.as_deref()
    }

    /// Populate the session after sign-in: username plus the full
    /// account list.
    pub fn init(&mut self, transport: &dyn Transport) -> WeblinkResult<()> {
        let username = api::get_username(transport)?;
        crate::log_info!("session", "Session initialized", username = username);
        self.username = Some(username);
        self.refresh_accounts(transport)
    }

    /// Re-fetch every account balance from the backend.
    pub fn refresh_accounts(&mut self, transport: &dyn Transport) -> WeblinkResult<()> {
        let accounts = api::account_refresh(transport)?;
        let parsed: Vec<(String, U256)> = accounts
            .into_iter()
            .map(|a| {
                let balance = amounts::parse_hex_quantity(&a.balance)?;
                Ok((a.address, balance))
            })
            .collect::<WeblinkResult<_>>()?;

        self.accounts.bulk_upsert(parsed);
        Ok(())
    }

    /// Register an account manually by address.
    pub fn add_account(&mut self, transport: &dyn Transport, address: &str) -> WeblinkResult<()> {
        let account = api::account_add(transport, address)?;
        let balance = amounts::parse_hex_quantity(&account.balance)?;
        self.accounts.upsert(account.address, balance);
        Ok(())
    }

    /// Start a device-link handshake.
    pub fn link_device(&mut self, transport: &dyn Transport) -> WeblinkResult<()> {
        self.coordinator.request_device_link(transport)
    }

    /// Validate a transfer against live figures and, when accepted, build
    /// the unsigned transaction and start the signing handshake.
    pub fn transfer(
        &mut self,
        transport: &dyn Transport,
        request: &TransferRequest,
    ) -> WeblinkResult<TransferOutcome> {
        let info = api::account_info(transport, &request.from)?;

        let balance = amounts::parse_hex_quantity(&info.balance)?;
        let gas_price = amounts::parse_hex_quantity(&info.gas_price)?;
        let estimated_gas = amounts::parse_hex_quantity(&info.estimated_gas)?;
        let nonce = amounts::parse_hex_quantity(&info.transaction_count)?;
        let gas_limit = U256::from(request.gas_limit);

        let decision = amounts::validate_transfer(
            balance,
            gas_price,
            estimated_gas,
            gas_limit,
            &request.amount_ether,
        )?;

        let value_wei = match &decision {
            TransferDecision::Accepted { value_wei, .. } => *value_wei,
            _ => {
                crate::log_info!("session", "Transfer rejected by validation");
                return Ok(TransferOutcome::Rejected(decision));
            }
        };

        let params = TransferParams {
            from: request.from.clone(),
            to: request.to.clone(),
            value_wei,
            gas_price,
            gas_limit,
        };
        let unsigned = build_unsigned_transaction(&params, nonce, self.settings.chain_id)?;

        self.coordinator
            .request_transaction_signing(transport, &unsigned, estimated_gas)?;

        Ok(TransferOutcome::SigningRequested(unsigned))
    }

    /// Remove the selected accounts, one at a time.
    pub fn remove_accounts<S: AsRef<str>>(
        &mut self,
        transport: &dyn Transport,
        addresses: &[S],
    ) -> BatchReport {
        remove_accounts_sequential(transport, &mut self.accounts, addresses)
    }

    /// Subscribe the session to its private push channel. Called once
    /// after `init`; on failure the session simply has no live updates
    /// until the embedding UI retries the subscription.
    pub fn connect_push(&mut self, channel: &mut dyn PushChannel) -> WeblinkResult<()> {
        channel.subscribe(PRIVATE_CHANNEL)
    }

    /// Drain every frame currently available on the channel into the
    /// session. Returns the resolutions produced, in arrival order.
    pub fn pump_push(
        &mut self,
        channel: &mut dyn PushChannel,
    ) -> WeblinkResult<Vec<Resolution>> {
        let mut resolutions = Vec::new();
        while let Some(raw) = channel.poll()? {
            if let Some(resolution) = self.handle_push(&raw) {
                resolutions.push(resolution);
            }
        }
        Ok(resolutions)
    }

    /// Feed one raw push frame into the session. Malformed frames are
    /// dropped; recognized events update the console, the store or the
    /// pending handshakes.
    pub fn handle_push(&mut self, raw: &str) -> Option<Resolution> {
        let event = push::decode(raw)?;

        if let PushEvent::Console { data } = &event {
            self.console.append(data.clone());
            return Some(Resolution::Ignored);
        }

        let resolution = self.coordinator.resolve(&event, &mut self.accounts);
        if let Resolution::TransactionConfirmed(hash) = &resolution {
            crate::log_info!("session", "Transaction confirmed", hash = hash);
            self.last_receipt = Some(hash.clone());
        }
        Some(resolution)
    }

    /// End the backend session and drop all local state.
    pub fn sign_out(&mut self, transport: &dyn Transport) -> WeblinkResult<()> {
        api::sign_out(transport)?;
        self.coordinator.reset();
        self.username = None;
        self.accounts = AccountStore::new();
        self.console.clear();
        self.last_receipt = None;
        Ok(())
    }
}
