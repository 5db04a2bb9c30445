//! In-process mock Flink SQL Gateway for integration tests.
//!
//! Serves scripted HTTP/1.1 JSON responses over a real TCP socket so the
//! client exercises its full transport path. Statements are matched by
//! prefix to a scripted sequence of poll responses; the last entry of a
//! sequence repeats, so a single `NotReady` means "not ready forever".

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One scripted response for an operation's result endpoint.
#[derive(Clone, Debug)]
pub enum Poll {
    NotReady,
    Payload(Vec<Vec<Value>>),
    Eos(Vec<Vec<Value>>),
    /// Answer with this HTTP status and an empty JSON body.
    Status(u16),
    /// Answer with an arbitrary resultType tag.
    Tag(&'static str),
    /// Answer with this resultType tag and no `results` field at all.
    Bare(&'static str),
}

/// One HTTP request the mock received.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Clone)]
struct Rule {
    prefix: String,
    polls: Vec<Poll>,
}

#[derive(Default)]
struct State {
    rules: Vec<Rule>,
    pending: HashMap<String, Vec<Poll>>,
    next_op: u64,
    requests: Vec<Recorded>,
    statement_status: Option<u16>,
}

pub struct MockGateway {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
}

impl MockGateway {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(State::default()));
        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let state = Arc::clone(&accept_state);
                tokio::spawn(async move {
                    let _ = serve(stream, state).await;
                });
            }
        });
        Self { addr, state }
    }

    pub fn host_port(&self) -> String {
        self.addr.to_string()
    }

    /// Script the poll sequence for statements starting with `prefix`.
    /// Unmatched statements complete immediately with an empty `EOS`.
    pub fn on_statement(&self, prefix: &str, polls: Vec<Poll>) -> &Self {
        self.state.lock().unwrap().rules.push(Rule {
            prefix: prefix.to_string(),
            polls,
        });
        self
    }

    /// Make every statement POST answer with this HTTP status.
    pub fn reject_statements_with(&self, status: u16) {
        self.state.lock().unwrap().statement_status = Some(status);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Number of result polls recorded for one operation handle.
    pub fn poll_count(&self, operation: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == "GET" && r.path.contains(&format!("/operations/{operation}/")))
            .count()
    }

    /// Statement texts in submission order.
    pub fn statements(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter(|r| r.method == "POST" && r.path.ends_with("/statements"))
            .filter_map(|r| {
                serde_json::from_str::<Value>(&r.body)
                    .ok()?
                    .get("statement")?
                    .as_str()
                    .map(String::from)
            })
            .collect()
    }
}

/// Rows of single-string fields, the shape of SHOW results.
pub fn name_rows(names: &[&str]) -> Vec<Vec<Value>> {
    names.iter().map(|n| vec![json!(n)]).collect()
}

async fn serve(mut stream: TcpStream, state: Arc<Mutex<State>>) -> std::io::Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    loop {
        // Read until the header block is complete.
        let header_end = loop {
            if let Some(pos) = find_header_end(&buf) {
                break pos;
            }
            let mut chunk = [0u8; 4096];
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();
        let content_length = lines
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        while buf.len() < body_start + content_length {
            let mut chunk = [0u8; 4096];
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[body_start..body_start + content_length]).to_string();
        buf.drain(..body_start + content_length);

        let (status, response_body) = route(&state, &method, &path, &body);
        let reason = if status < 400 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: keep-alive\r\n\r\n{response_body}",
            response_body.len()
        );
        stream.write_all(response.as_bytes()).await?;
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn route(state: &Arc<Mutex<State>>, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut st = state.lock().unwrap();
    st.requests.push(Recorded {
        method: method.to_string(),
        path: path.to_string(),
        body: body.to_string(),
    });

    if method == "POST" && path == "/v1/sessions" {
        return (200, json!({ "sessionHandle": "S1" }).to_string());
    }

    if method == "POST" && path.starts_with("/v1/sessions/") && path.ends_with("/statements") {
        if let Some(status) = st.statement_status {
            return (status, json!({ "errors": ["statement rejected"] }).to_string());
        }
        let statement = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("statement")?.as_str().map(String::from))
            .unwrap_or_default();
        let polls = st
            .rules
            .iter()
            .find(|r| statement.starts_with(&r.prefix))
            .map(|r| r.polls.clone())
            .unwrap_or_else(|| vec![Poll::Eos(vec![])]);
        st.next_op += 1;
        let op = format!("op-{}", st.next_op);
        st.pending.insert(op.clone(), polls);
        return (200, json!({ "operationHandle": op }).to_string());
    }

    if method == "GET" && path.contains("/operations/") && path.ends_with("/result/0") {
        let op = path
            .split('/')
            .rev()
            .nth(2)
            .unwrap_or_default()
            .to_string();
        let next = match st.pending.get_mut(&op) {
            Some(polls) if polls.len() > 1 => polls.remove(0),
            Some(polls) if polls.len() == 1 => polls[0].clone(),
            _ => Poll::Eos(vec![]),
        };
        return match next {
            Poll::NotReady => (200, json!({ "resultType": "NOT_READY" }).to_string()),
            Poll::Payload(rows) => (200, result_body("PAYLOAD", rows)),
            Poll::Eos(rows) => (200, result_body("EOS", rows)),
            Poll::Status(code) => (code, "{}".to_string()),
            Poll::Tag(tag) => (
                200,
                json!({ "resultType": tag, "results": { "data": [] } }).to_string(),
            ),
            Poll::Bare(tag) => (200, json!({ "resultType": tag }).to_string()),
        };
    }

    if method == "DELETE" && path.starts_with("/v1/sessions/") {
        return (200, "{}".to_string());
    }

    (404, json!({ "errors": ["no such route"] }).to_string())
}

fn result_body(tag: &str, rows: Vec<Vec<Value>>) -> String {
    let data: Vec<Value> = rows.into_iter().map(|fields| json!({ "fields": fields })).collect();
    json!({ "resultType": tag, "results": { "data": data } }).to_string()
}
