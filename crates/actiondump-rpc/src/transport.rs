//! The wire seam of the client.
//!
//! [`RpcClient`](crate::RpcClient) only needs something that posts one
//! request envelope and hands back the decoded response envelope. The
//! production [`HttpTransport`] does that over HTTP(S); tests substitute a
//! scripted implementation.

use crate::error::TransportError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const JSON_RPC_MIME: &str = "application/json-rpc";

pub trait Transport {
    /// Posts `request` and returns the parsed response body.
    ///
    /// `bearer` is sent as an `Authorization: Bearer` header when present.
    fn post(&self, request: &Value, bearer: Option<&str>) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, request: &Value, bearer: Option<&str>) -> Result<Value, TransportError> {
        (**self).post(request, bearer)
    }
}

#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_tls: true,
        }
    }
}

/// Blocking HTTP transport posting to the `api_jsonrpc.php` endpoint.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url, options: &TransportOptions) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(!options.verify_tls)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn post(&self, request: &Value, bearer: Option<&str>) -> Result<Value, TransportError> {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, JSON_RPC_MIME)
            .header(ACCEPT, "application/json")
            .json(request);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send()?.error_for_status()?;
        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}
