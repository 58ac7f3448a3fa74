//! In-memory transport for tests.
//!
//! A [`ScriptedTransport`] answers each request through a closure keyed on
//! the method name and records everything it was sent.

use crate::error::TransportError;
use crate::transport::Transport;
use serde_json::{json, Value};
use std::cell::RefCell;

type Handler = dyn Fn(&str, &Value) -> Result<Value, TransportError>;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
    pub id: u64,
    pub bearer: Option<String>,
    pub request: Value,
}

pub struct ScriptedTransport {
    handler: Box<Handler>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// `handler` receives the method and params and returns the full
    /// response envelope (see [`ok`] and [`api_error`]).
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, TransportError> + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.method == method).count()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.method.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn post(&self, request: &Value, bearer: Option<&str>) -> Result<Value, TransportError> {
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let params = request["params"].clone();
        self.calls.borrow_mut().push(RecordedCall {
            method: method.clone(),
            params: params.clone(),
            id: request["id"].as_u64().unwrap_or_default(),
            bearer: bearer.map(str::to_string),
            request: request.clone(),
        });
        (self.handler)(&method, &params)
    }
}

/// Success envelope carrying `result`.
pub fn ok(result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "result": result, "id": 1 })
}

/// Error envelope in the shape Zabbix uses.
pub fn api_error(code: i64, message: &str, data: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message, "data": data },
        "id": 1
    })
}
