//! Blocking client for the Zabbix JSON-RPC API.
//!
//! Every call is a single request/response round-trip without retries.
//! Authentication uses the bearer scheme of Zabbix 7.2+: the token returned
//! by `user.login` travels in the `Authorization` header, never in the JSON
//! body. The token is an explicit argument of each call; the client itself
//! only keeps the request-id counter.

pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use error::{ApiError, Result, RpcError, TransportError};
pub use transport::{HttpTransport, Transport, TransportOptions};

use actiondump_core::{Action, EventSource};
use serde_json::{json, Value};
use std::cell::Cell;
use std::fmt;
use tracing::debug;

/// Session token returned by `user.login`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

pub struct RpcClient<T> {
    transport: T,
    next_id: Cell<u64>,
}

impl<T: Transport> RpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: Cell::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Number of requests issued so far.
    pub fn calls_made(&self) -> u64 {
        self.next_id.get() - 1
    }

    /// Issues one JSON-RPC call and returns its `result` member unchanged.
    pub fn call(&self, method: &str, params: Value, token: Option<&AuthToken>) -> Result<Value> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });
        debug!(method, id, authenticated = token.is_some(), "json-rpc call");

        let transport_err = |source| RpcError::Transport {
            method: method.to_string(),
            source,
        };
        let mut envelope = self
            .transport
            .post(&request, token.map(AuthToken::expose))
            .map_err(transport_err)?;

        if let Some(error) = envelope.get_mut("error") {
            return Err(RpcError::Api {
                method: method.to_string(),
                error: ApiError::new(error.take()),
            });
        }
        envelope
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| transport_err(TransportError::MissingResult))
    }

    /// Decodes the result of `method` into `R`; a shape mismatch counts as a
    /// malformed response.
    fn call_as<R>(&self, method: &str, params: Value, token: Option<&AuthToken>) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let result = self.call(method, params, token)?;
        serde_json::from_value(result).map_err(|e| RpcError::Transport {
            method: method.to_string(),
            source: TransportError::Decode(e),
        })
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthToken> {
        let params = json!({ "username": username, "password": password });
        self.call_as::<String>("user.login", params, None)
            .map(AuthToken)
    }

    pub fn logout(&self, token: &AuthToken) -> Result<()> {
        self.call("user.logout", json!([]), Some(token)).map(|_| ())
    }

    /// Fetches every action of `source` with its filter and all three
    /// operation lists expanded.
    pub fn fetch_actions(&self, token: &AuthToken, source: &EventSource) -> Result<Vec<Action>> {
        let params = json!({
            "output": "extend",
            "filter": { "eventsource": source.code() },
            "selectOperations": "extend",
            "selectRecoveryOperations": "extend",
            "selectAcknowledgeOperations": "extend",
            "selectFilter": "extend",
        });
        self.call_as("action.get", params, Some(token))
    }
}
