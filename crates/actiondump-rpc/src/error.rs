use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The request never produced a usable JSON-RPC envelope.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout, TLS or non-2xx status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response carries neither `result` nor `error`")]
    MissingResult,
}

/// Application-level error reported by the server, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    payload: Value,
}

impl ApiError {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn code(&self) -> Option<i64> {
        self.payload.get("code").and_then(Value::as_i64)
    }

    pub fn message(&self) -> Option<&str> {
        self.payload.get("message").and_then(Value::as_str)
    }

    pub fn data(&self) -> Option<&str> {
        self.payload.get("data").and_then(Value::as_str)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.message(), self.data()) {
            (Some(message), Some(data)) => write!(f, "{message} {data}")?,
            (Some(message), None) => f.write_str(message)?,
            _ => return write!(f, "{}", self.payload),
        }
        match self.code() {
            Some(code) => write!(f, " (code {code})"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error calling `{method}`: {source}")]
    Transport {
        method: String,
        #[source]
        source: TransportError,
    },
    #[error("API error from `{method}`: {error}")]
    Api { method: String, error: ApiError },
}

impl RpcError {
    pub fn method(&self) -> &str {
        match self {
            Self::Transport { method, .. } | Self::Api { method, .. } => method,
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_display_prefers_message_and_data() {
        let err = ApiError::new(json!({
            "code": -32602,
            "message": "Invalid params.",
            "data": "Incorrect user name or password or account is temporarily blocked."
        }));
        assert_eq!(
            err.to_string(),
            "Invalid params. Incorrect user name or password or account is temporarily blocked. (code -32602)"
        );
    }

    #[test]
    fn api_error_without_message_shows_raw_payload() {
        let err = ApiError::new(json!("boom"));
        assert_eq!(err.to_string(), "\"boom\"");
        assert_eq!(err.payload(), &json!("boom"));
    }
}
