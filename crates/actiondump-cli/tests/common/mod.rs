//! Minimal in-process JSON-RPC server standing in for a Zabbix frontend.

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// HTTP status and body sent back for one request.
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
        }
    }
}

pub struct FakeZabbix {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeZabbix {
    /// Serves every request by calling `respond(method, params)` for the
    /// full response envelope. One request per connection.
    pub fn spawn<F>(respond: F) -> Self
    where
        F: Fn(&str, &Value) -> Value + Send + 'static,
    {
        Self::spawn_raw(move |method, params| {
            let body = serde_json::to_vec(&respond(method, params)).expect("encode response");
            Reply { status: 200, body }
        })
    }

    /// Like [`FakeZabbix::spawn`], but `respond` controls the HTTP status
    /// and the exact body bytes.
    pub fn spawn_raw<F>(respond: F) -> Self
    where
        F: Fn(&str, &Value) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                if let Err(e) = serve(stream, &respond, &log) {
                    eprintln!("fake server: {e}");
                }
            }
        });

        Self { addr, seen }
    }

    /// Frontend base URL, as an operator would configure it.
    pub fn base_url(&self) -> String {
        format!("http://{}/zabbix", self.addr)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("request log").clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.seen().into_iter().map(|r| r.method).collect()
    }
}

fn serve<F>(mut stream: TcpStream, respond: &F, log: &Mutex<Vec<SeenRequest>>) -> std::io::Result<()>
where
    F: Fn(&str, &Value) -> Reply,
{
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let mut content_length = 0usize;
    let mut authorization = None;
    loop {
        line.clear();
        reader.read_line(&mut line)?;
        let header = line.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let method = body["method"].as_str().unwrap_or_default().to_string();

    let reply = respond(&method, &body["params"]);
    log.lock().expect("request log").push(SeenRequest {
        method,
        authorization,
        body,
    });

    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.body.len()
    )?;
    stream.write_all(&reply.body)?;
    stream.flush()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Status",
    }
}

pub fn ok(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "result": result, "id": 1})
}

pub fn error(code: i64, message: &str, data: &str) -> Value {
    json!({"jsonrpc": "2.0", "error": {"code": code, "message": message, "data": data}, "id": 1})
}

/// A free local port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/zabbix")
}
