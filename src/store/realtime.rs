//! Change notifications over Supabase Realtime.
//!
//! Realtime speaks the Phoenix channel protocol over a websocket:
//! - join `realtime:public:<table>` with a `postgres_changes` config for all events
//! - send a `heartbeat` on the `phoenix` topic every 30 seconds
//! - every `postgres_changes` frame on the joined topic means "the table changed"
//!
//! The payload is ignored; the dashboard refetches the whole table instead of
//! merging rows.

use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use reqwest::Url;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message as WsMessage, WebSocket};

use super::{ChangeCallback, ChangeFeed, StoreError, Subscription};
use crate::config::StoreConfig;

/// Interval between Phoenix heartbeats.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// How long a blocking read waits before the loop checks the stop flag.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Upper bound for TCP connect and the websocket handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay before reconnecting after the socket drops.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Builds the websocket URL for a project.
///
/// `https://abc.supabase.co` becomes
/// `wss://abc.supabase.co/realtime/v1/websocket?apikey=<key>&vsn=1.0.0`.
pub fn realtime_url(config: &StoreConfig) -> Result<String, StoreError> {
    let mut url = Url::parse(&config.url).map_err(|e| StoreError::Transport(e.to_string()))?;
    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(StoreError::Transport(format!(
                "unsupported scheme '{}'",
                other
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| StoreError::Transport("cannot switch URL scheme".to_string()))?;
    url.set_path("/realtime/v1/websocket");
    url.query_pairs_mut()
        .clear()
        .append_pair("apikey", &config.key)
        .append_pair("vsn", "1.0.0");
    Ok(url.to_string())
}

/// Channel topic for a table in the `public` schema.
pub(crate) fn topic_for(table: &str) -> String {
    format!("realtime:public:{}", table)
}

/// Join frame subscribing to every change on `table`.
pub(crate) fn join_frame(table: &str, key: &str, join_ref: u64) -> String {
    json!({
        "topic": topic_for(table),
        "event": "phx_join",
        "payload": {
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [
                    { "event": "*", "schema": "public", "table": table }
                ]
            },
            "access_token": key
        },
        "ref": join_ref.to_string(),
        "join_ref": join_ref.to_string()
    })
    .to_string()
}

pub(crate) fn heartbeat_frame(msg_ref: u64) -> String {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": msg_ref.to_string()
    })
    .to_string()
}

/// What an incoming frame means for the subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A row changed on the watched table.
    Change,
    /// The server acknowledged the join.
    Joined,
    /// The server rejected the join or closed the channel.
    ChannelError(String),
    /// Heartbeat replies, presence, system notices, other topics.
    Ignored,
}

/// Classifies a text frame received on the socket.
pub(crate) fn classify_frame(text: &str, topic: &str) -> Frame {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Frame::Ignored;
    };
    if value.get("topic").and_then(Value::as_str) != Some(topic) {
        return Frame::Ignored;
    }
    let event = value.get("event").and_then(Value::as_str).unwrap_or("");
    let payload = value.get("payload").cloned().unwrap_or(Value::Null);
    match event {
        "postgres_changes" => Frame::Change,
        "phx_reply" => match payload.get("status").and_then(Value::as_str) {
            Some("ok") => Frame::Joined,
            Some(status) => Frame::ChannelError(reply_reason(&payload, status)),
            None => Frame::Ignored,
        },
        "phx_error" => Frame::ChannelError("channel error".to_string()),
        "phx_close" => Frame::ChannelError("channel closed by server".to_string()),
        "system" if payload.get("status").and_then(Value::as_str) == Some("error") => {
            Frame::ChannelError(reply_reason(&payload, "error"))
        }
        _ => Frame::Ignored,
    }
}

fn reply_reason(payload: &Value, status: &str) -> String {
    payload
        .pointer("/response/reason")
        .or_else(|| payload.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

/// [`ChangeFeed`] backed by a Supabase Realtime websocket.
pub struct RealtimeFeed {
    url: String,
    key: String,
}

impl RealtimeFeed {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        Ok(Self {
            url: realtime_url(config)?,
            key: config.key.clone(),
        })
    }
}

impl ChangeFeed for RealtimeFeed {
    fn subscribe(
        &self,
        table: &str,
        on_change: ChangeCallback,
    ) -> Result<Subscription, StoreError> {
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = stop.clone();
        let url = self.url.clone();
        let key = self.key.clone();
        let worker_table = table.to_string();

        let handle = thread::Builder::new()
            .name(format!("realtime-{}", table))
            .spawn(move || run_feed(&url, &key, &worker_table, &worker_stop, &on_change))
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        info!(table, "subscribed to change notifications");
        Ok(Subscription::new(table, stop, Some(handle)))
    }
}

/// Connect/read loop. Reconnects after a delay until `stop` is set.
fn run_feed(url: &str, key: &str, table: &str, stop: &AtomicBool, on_change: &ChangeCallback) {
    while !stop.load(Ordering::Relaxed) {
        match connect(url) {
            Ok(mut socket) => {
                if let Err(e) = read_loop(&mut socket, key, table, stop, on_change) {
                    warn!(table, error = %e, "change feed disconnected");
                }
                let _ = socket.close(None);
            }
            Err(e) => warn!(table, error = %e, "change feed connection failed"),
        }
        sleep_unless_stopped(RECONNECT_DELAY, stop);
    }
    debug!(table, "change feed stopped");
}

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

fn connect(url: &str) -> Result<Socket, StoreError> {
    let parsed = Url::parse(url).map_err(transport)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| StoreError::Transport("URL has no host".to_string()))?;
    let port = parsed.port_or_known_default().unwrap_or(443);
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(transport)?
        .next()
        .ok_or_else(|| StoreError::Transport(format!("cannot resolve {}", host)))?;

    // Bounded so that a teardown never waits on a dead host.
    let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(transport)?;
    stream
        .set_read_timeout(Some(CONNECT_TIMEOUT))
        .map_err(transport)?;

    let (socket, _response) = tungstenite::client_tls(url, stream).map_err(transport)?;
    set_read_timeout(&socket, Some(READ_TIMEOUT)).map_err(transport)?;
    Ok(socket)
}

fn transport(e: impl std::fmt::Display) -> StoreError {
    StoreError::Transport(e.to_string())
}

fn set_read_timeout(socket: &Socket, timeout: Option<Duration>) -> std::io::Result<()> {
    match socket.get_ref() {
        MaybeTlsStream::Plain(s) => s.set_read_timeout(timeout),
        MaybeTlsStream::Rustls(s) => s.get_ref().set_read_timeout(timeout),
        _ => Ok(()),
    }
}

fn read_loop(
    socket: &mut Socket,
    key: &str,
    table: &str,
    stop: &AtomicBool,
    on_change: &ChangeCallback,
) -> Result<(), StoreError> {
    let topic = topic_for(table);
    let mut msg_ref: u64 = 1;
    send_text(socket, join_frame(table, key, msg_ref))?;
    let mut last_heartbeat = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        if last_heartbeat.elapsed() >= HEARTBEAT_INTERVAL {
            msg_ref += 1;
            send_text(socket, heartbeat_frame(msg_ref))?;
            last_heartbeat = Instant::now();
        }

        match socket.read() {
            Ok(WsMessage::Text(text)) => match classify_frame(text.as_str(), &topic) {
                Frame::Change => {
                    debug!(table, "change notification");
                    on_change();
                }
                Frame::Joined => info!(table, "change feed joined"),
                Frame::ChannelError(reason) => return Err(StoreError::query(reason)),
                Frame::Ignored => {}
            },
            Ok(WsMessage::Close(_)) => {
                return Err(StoreError::Transport("socket closed".to_string()));
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => return Err(StoreError::Transport(e.to_string())),
        }
    }
    Ok(())
}

fn send_text(socket: &mut Socket, frame: String) -> Result<(), StoreError> {
    socket
        .send(WsMessage::text(frame))
        .map_err(|e| StoreError::Transport(e.to_string()))
}

fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) {
    let step = Duration::from_millis(100);
    let deadline = Instant::now() + total;
    while !stop.load(Ordering::Relaxed) && Instant::now() < deadline {
        thread::sleep(step);
    }
}
