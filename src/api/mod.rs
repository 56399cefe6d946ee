//! API Module
//!
//! Backend collaborator access: the `Transport` seam, the blocking HTTP
//! implementation and a typed helper per backend route.

mod client;

pub use client::HttpTransport;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{WeblinkError, WeblinkResult};
use crate::types::{
    ApiEnvelope, LinkTokenResponse, TransactRequest, TransactResponse, UnsignedTransaction,
    WireAccount, WireAccountInfo, WireAccountList,
};

/// Backend routes, relative to the configured base URL.
pub mod routes {
    pub const GET_USERNAME: &str = "get-username";
    pub const SIGN_OUT: &str = "signout";
    pub const ACCOUNT_REFRESH: &str = "account-refresh";
    pub const ACCOUNT_ADD: &str = "account-add";
    pub const ACCOUNT_REMOVE: &str = "account-remove";
    pub const ACCOUNT_INFO: &str = "account-info";
    pub const ACCOUNT_TRANSACT: &str = "account-transact";
    pub const ACCOUNT_ADD_HW_REQ: &str = "account-add-hw-req";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Seam between the core and the backend HTTP stack.
///
/// Returns the HTTP status and the decoded response envelope. Transport
/// errors (connect, timeout, non-JSON body) surface as `Err`; backend
/// rejections come back as a `ko` envelope for the caller to interpret.
pub trait Transport {
    fn call(
        &self,
        method: Method,
        route: &str,
        body: Option<serde_json::Value>,
    ) -> WeblinkResult<(u16, ApiEnvelope)>;
}

/// A call succeeds iff the HTTP status is 200 and the envelope is `ok`.
fn expect_ok(route: &str, status: u16, envelope: ApiEnvelope) -> WeblinkResult<serde_json::Value> {
    if status == 200 && envelope.is_ok() {
        Ok(envelope.data)
    } else {
        crate::log_warn!("api", "Backend rejected request", route = route, status = status);
        Err(WeblinkError::backend_rejected(format!(
            "Request '{}' rejected (HTTP {})",
            route, status
        )))
    }
}

fn decode_data<T: DeserializeOwned>(route: &str, data: serde_json::Value) -> WeblinkResult<T> {
    serde_json::from_value(data).map_err(|e| {
        WeblinkError::parse_error(format!("Malformed '{}' response: {}", route, e))
    })
}

/// Fetch the signed-in user's display name.
pub fn get_username(transport: &dyn Transport) -> WeblinkResult<String> {
    let (status, envelope) = transport.call(Method::Get, routes::GET_USERNAME, None)?;
    let data = expect_ok(routes::GET_USERNAME, status, envelope)?;
    decode_data(routes::GET_USERNAME, data)
}

/// End the backend session. The backend exposes this as a GET.
pub fn sign_out(transport: &dyn Transport) -> WeblinkResult<()> {
    let (status, envelope) = transport.call(Method::Get, routes::SIGN_OUT, None)?;
    expect_ok(routes::SIGN_OUT, status, envelope)?;
    Ok(())
}

/// Fetch the full account list with current balances.
pub fn account_refresh(transport: &dyn Transport) -> WeblinkResult<Vec<WireAccount>> {
    let (status, envelope) = transport.call(Method::Get, routes::ACCOUNT_REFRESH, None)?;
    let data = expect_ok(routes::ACCOUNT_REFRESH, status, envelope)?;
    let list: WireAccountList = decode_data(routes::ACCOUNT_REFRESH, data)?;
    Ok(list.accounts)
}

/// Register an account by address.
pub fn account_add(transport: &dyn Transport, address: &str) -> WeblinkResult<WireAccount> {
    let body = json!({ "address": address });
    let (status, envelope) = transport.call(Method::Post, routes::ACCOUNT_ADD, Some(body))?;
    let data = expect_ok(routes::ACCOUNT_ADD, status, envelope)?;
    decode_data(routes::ACCOUNT_ADD, data)
}

/// Remove a single account by address.
pub fn account_remove(transport: &dyn Transport, address: &str) -> WeblinkResult<()> {
    let body = json!({ "address": address });
    let (status, envelope) = transport.call(Method::Post, routes::ACCOUNT_REMOVE, Some(body))?;
    expect_ok(routes::ACCOUNT_REMOVE, status, envelope)?;
    Ok(())
}

/// Fetch per-account transfer figures (balance, gas price, estimated gas,
/// transaction count), all as hex quantities.
pub fn account_info(transport: &dyn Transport, address: &str) -> WeblinkResult<WireAccountInfo> {
    let body = json!({ "address": address });
    let (status, envelope) = transport.call(Method::Post, routes::ACCOUNT_INFO, Some(body))?;
    let data = expect_ok(routes::ACCOUNT_INFO, status, envelope)?;
    decode_data(routes::ACCOUNT_INFO, data)
}

/// Submit an unsigned transaction; the backend stores it and returns the
/// one-time signing token plus the expected signer address.
pub fn submit_transaction(
    transport: &dyn Transport,
    unsigned: &UnsignedTransaction,
) -> WeblinkResult<TransactResponse> {
    let request = TransactRequest::from(unsigned);
    let body = serde_json::to_value(&request)?;
    let (status, envelope) = transport.call(Method::Post, routes::ACCOUNT_TRANSACT, Some(body))?;
    let data = expect_ok(routes::ACCOUNT_TRANSACT, status, envelope)?;
    decode_data(routes::ACCOUNT_TRANSACT, data)
}

/// Request a one-time token for linking a new hardware device. The
/// backend exposes this as a GET.
pub fn link_token(transport: &dyn Transport) -> WeblinkResult<LinkTokenResponse> {
    let (status, envelope) = transport.call(Method::Get, routes::ACCOUNT_ADD_HW_REQ, None)?;
    let data = expect_ok(routes::ACCOUNT_ADD_HW_REQ, status, envelope)?;
    decode_data(routes::ACCOUNT_ADD_HW_REQ, data)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// In-memory transport recording calls and replaying canned replies.
    pub struct MockTransport {
        pub calls: RefCell<Vec<(Method, String, Option<serde_json::Value>)>>,
        pub replies: RefCell<VecDeque<WeblinkResult<(u16, ApiEnvelope)>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                replies: RefCell::new(VecDeque::new()),
            }
        }

        pub fn push_ok(&self, data: serde_json::Value) {
            self.replies.borrow_mut().push_back(Ok((
                200,
                ApiEnvelope {
                    status: crate::types::ApiStatus::Ok,
                    data,
                },
            )));
        }

        pub fn push_ko(&self) {
            self.replies.borrow_mut().push_back(Ok((
                200,
                ApiEnvelope {
                    status: crate::types::ApiStatus::Ko,
                    data: serde_json::Value::Null,
                },
            )));
        }

        pub fn push_err(&self, err: WeblinkError) {
            self.replies.borrow_mut().push_back(Err(err));
        }

        pub fn routes_called(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(_, r, _)| r.clone()).collect()
        }
    }

    impl Transport for MockTransport {
        fn call(
            &self,
            method: Method,
            route: &str,
            body: Option<serde_json::Value>,
        ) -> WeblinkResult<(u16, ApiEnvelope)> {
            self.calls
                .borrow_mut()
                .push((method, route.to_string(), body));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(WeblinkError::internal("No canned reply queued")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::MockTransport;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_username_decodes_data() {
        let mock = MockTransport::new();
        mock.push_ok(json!("alice"));

        let name = get_username(&mock).unwrap();
        assert_eq!(name, "alice");
        assert_eq!(mock.routes_called(), vec![routes::GET_USERNAME]);
    }

    #[test]
    fn test_ko_envelope_is_rejection() {
        let mock = MockTransport::new();
        mock.push_ko();

        let err = account_refresh(&mock).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::BackendRejected);
    }

    #[test]
    fn test_account_info_parses_hex_quantities() {
        let mock = MockTransport::new();
        mock.push_ok(json!({
            "address": "0xabc",
            "balance": "0x8ac7230489e80000",
            "gasPrice": "0x3b9aca00",
            "estimatedGas": "0x5208",
            "transactionCount": "0x7"
        }));

        let info = account_info(&mock, "0xabc").unwrap();
        assert_eq!(info.balance, "0x8ac7230489e80000");
        assert_eq!(info.estimated_gas, "0x5208");
        assert_eq!(info.transaction_count, "0x7");

        let calls = mock.calls.borrow();
        assert_eq!(calls[0].0, Method::Post);
        assert_eq!(calls[0].2.as_ref().unwrap()["address"], "0xabc");
    }

    #[test]
    fn test_link_token_uses_get() {
        let mock = MockTransport::new();
        mock.push_ok(json!({ "token": "tok-9" }));

        let resp = link_token(&mock).unwrap();
        assert_eq!(resp.token, "tok-9");

        let calls = mock.calls.borrow();
        assert_eq!(calls[0].0, Method::Get);
        assert!(calls[0].2.is_none());
    }

    #[test]
    fn test_sign_out_uses_get() {
        let mock = MockTransport::new();
        mock.push_ok(json!(null));

        sign_out(&mock).unwrap();

        let calls = mock.calls.borrow();
        assert_eq!(calls[0].0, Method::Get);
        assert_eq!(calls[0].1, routes::SIGN_OUT);
        assert!(calls[0].2.is_none());
    }
}
