//! Realtime relay over Socket.IO with auto-reconnect.
//!
//! Opens a single Socket.IO connection (WebSocket transport) to the
//! backend and streams typed [`RealtimeEvent`]s through a
//! [`tokio::sync::broadcast`] channel. Connection state is published on a
//! [`tokio::sync::watch`] channel. Reconnection uses exponential backoff
//! with jitter; rooms joined before a drop are re-joined afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use innkeep_api::realtime::{RealtimeConfig, RealtimeHandle};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = RealtimeConfig::new(Url::parse("wss://api.innkeep.app")?);
//! let handle = RealtimeHandle::connect(config, CancellationToken::new())?;
//! let mut rx = handle.subscribe();
//! handle.join_property("12");
//!
//! while let Ok(event) = rx.recv().await {
//!     println!("{}", event.name());
//! }
//! ```

mod event;
mod packet;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use url::Url;

pub use event::{
    CLEANUP_COMPLETED, DEVICE_STATUS_CHANGED, GUEST_AUTO_CHECKOUT, GUEST_CHECKED_IN,
    GUEST_CHECKED_OUT, GUEST_DELETED, RealtimeEvent, SESSIONS_CLEARED,
};

use crate::error::Error;
use packet::{EnginePacket, SocketPacket};

const EVENT_CHANNEL_CAPACITY: usize = 256;
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

const JOIN_PROPERTY: &str = "join_property";
const LEAVE_PROPERTY: &str = "leave_property";

// ── Configuration ────────────────────────────────────────────────────

/// Exponential backoff configuration for reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,
    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,
    /// Maximum consecutive failed attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Socket endpoint root, e.g. `wss://api.innkeep.app`. `http(s)` is
    /// accepted and mapped to `ws(s)`.
    pub url: Url,
    /// Bearer token sent in the Socket.IO connect auth object.
    pub token: Option<SecretString>,
    pub reconnect: ReconnectConfig,
}

impl RealtimeConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            reconnect: ReconnectConfig::default(),
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// `<url>/socket.io/?EIO=4&transport=websocket`
    pub fn socket_url(&self) -> Result<Url, Error> {
        let mut url = self.url.clone();
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(Error::Validation {
                    field: "ws_url".into(),
                    reason: format!("unsupported scheme {other:?}"),
                });
            }
        };
        url.set_scheme(scheme).map_err(|()| Error::Validation {
            field: "ws_url".into(),
            reason: "cannot switch to a WebSocket scheme".into(),
        })?;
        let path = format!("{}/socket.io/", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(Some("EIO=4&transport=websocket"));
        Ok(url)
    }
}

// ── Connection state ─────────────────────────────────────────────────

/// Observable relay state: drives the "live" banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
enum Control {
    Join(String),
    Leave(String),
}

// ── RealtimeHandle ───────────────────────────────────────────────────

/// Handle to the running relay task.
///
/// Dropping the handle tears the connection down.
#[derive(Debug)]
pub struct RealtimeHandle {
    event_rx: broadcast::Receiver<Arc<RealtimeEvent>>,
    control_tx: mpsc::UnboundedSender<Control>,
    status_rx: watch::Receiver<ConnectionStatus>,
    cancel: CancellationToken,
    closed: AtomicBool,
}

impl RealtimeHandle {
    /// Spawn the connection loop. Returns immediately; the first connection
    /// attempt happens in the background. Must be called inside a Tokio
    /// runtime.
    pub fn connect(config: RealtimeConfig, cancel: CancellationToken) -> Result<Self, Error> {
        let url = config.socket_url()?;
        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::default());

        let relay = Relay {
            url,
            auth: config
                .token
                .as_ref()
                .map(|t| json!({ "token": t.expose_secret() })),
            reconnect: config.reconnect,
            event_tx,
            status_tx,
            cancel: cancel.clone(),
            rooms: BTreeSet::new(),
        };
        tokio::spawn(relay.run(control_rx));

        Ok(Self {
            event_rx,
            control_tx,
            status_rx,
            cancel,
            closed: AtomicBool::new(false),
        })
    }

    /// A new receiver for the event stream. Lagging receivers get
    /// [`broadcast::error::RecvError::Lagged`]; missed events are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<RealtimeEvent>> {
        self.event_rx.resubscribe()
    }

    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.status_rx.borrow().connected
    }

    pub fn connection_error(&self) -> Option<String> {
        self.status_rx.borrow().error.clone()
    }

    /// Subscribe to a property's event room. Fire-and-forget: returns
    /// `false` without sending when the id is empty or the relay is not
    /// connected.
    pub fn join_property(&self, property_id: &str) -> bool {
        self.control(property_id, Control::Join)
    }

    /// Leave a property's event room. Same contract as
    /// [`join_property`](Self::join_property).
    pub fn leave_property(&self, property_id: &str) -> bool {
        self.control(property_id, Control::Leave)
    }

    fn control(&self, property_id: &str, make: fn(String) -> Control) -> bool {
        let id = property_id.trim();
        if id.is_empty() || self.closed.load(Ordering::SeqCst) || !self.is_connected() {
            return false;
        }
        self.control_tx.send(make(id.to_owned())).is_ok()
    }

    /// Tear down the relay. Idempotent: only the first call does anything,
    /// and it returns `true` only if a live connection is being closed.
    pub fn disconnect(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        let was_connected = self.is_connected();
        self.cancel.cancel();
        info!(was_connected, "realtime relay shutting down");
        was_connected
    }
}

impl Drop for RealtimeHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

struct Relay {
    url: Url,
    auth: Option<Value>,
    reconnect: ReconnectConfig,
    event_tx: broadcast::Sender<Arc<RealtimeEvent>>,
    status_tx: watch::Sender<ConnectionStatus>,
    cancel: CancellationToken,
    /// Rooms to re-join after a reconnect.
    rooms: BTreeSet<String>,
}

impl Relay {
    /// Main loop: connect → read → on error, backoff → reconnect.
    async fn run(mut self, mut control_rx: mpsc::UnboundedReceiver<Control>) {
        let mut attempt: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let result = self.connect_and_read(&mut control_rx, &mut attempt).await;
            self.status_tx.send_modify(|s| s.connected = false);

            if self.cancel.is_cancelled() {
                break;
            }

            match result {
                Ok(()) => {
                    info!("realtime connection closed cleanly, reconnecting");
                    attempt = 0;
                }
                Err(e) => {
                    warn!(error = %e, attempt, "realtime connection error");
                    self.status_tx.send_modify(|s| s.error = Some(e.to_string()));

                    if let Some(max) = self.reconnect.max_retries {
                        if attempt >= max {
                            warn!(
                                max_retries = max,
                                "realtime reconnection limit reached, giving up"
                            );
                            break;
                        }
                    }

                    let delay = calculate_backoff(attempt, &self.reconnect);
                    info!(
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        attempt,
                        "waiting before reconnect"
                    );

                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => break,
                        () = tokio::time::sleep(delay) => {}
                    }

                    attempt = attempt.saturating_add(1);
                }
            }
        }

        debug!("realtime loop exiting");
    }

    /// Run one connection: Engine.IO open, Socket.IO connect, then relay
    /// frames until the socket drops or the relay is cancelled.
    async fn connect_and_read(
        &mut self,
        control_rx: &mut mpsc::UnboundedReceiver<Control>,
        attempt: &mut u32,
    ) -> Result<(), Error> {
        info!(url = %self.url, "connecting realtime channel");

        let (ws_stream, _response) = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Ok(()),
            res = tokio_tungstenite::connect_async(self.url.as_str()) => {
                res.map_err(|e| Error::WebSocketConnect(e.to_string()))?
            }
        };
        let (mut write, mut read) = ws_stream.split();

        let mut connected = false;
        let mut deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        let mut heartbeat = HANDSHAKE_TIMEOUT;

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    if connected {
                        debug!("sending Socket.IO disconnect");
                        let _ = write.send(Message::text(packet::SOCKET_DISCONNECT)).await;
                        let _ = write.send(Message::Close(None)).await;
                    }
                    return Ok(());
                }
                () = tokio::time::sleep_until(deadline) => {
                    return Err(Error::Protocol(if connected {
                        "ping timeout".into()
                    } else {
                        "handshake timed out".into()
                    }));
                }
                Some(control) = control_rx.recv(), if connected => {
                    let frame = self.apply_control(control);
                    write
                        .send(Message::text(frame))
                        .await
                        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;
                }
                frame = read.next() => {
                    let text = match frame {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (u16::from(f.code), f.reason.as_str().to_owned()))
                                .unwrap_or((1005, String::new()));
                            info!(code, reason = %reason, "realtime close frame received");
                            return if connected {
                                Ok(())
                            } else {
                                Err(Error::WebSocketClosed { code, reason })
                            };
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(Error::WebSocketConnect(e.to_string())),
                        None => {
                            info!("realtime stream ended");
                            return Ok(());
                        }
                    };

                    match packet::decode_engine(&text)? {
                        EnginePacket::Open(body) => {
                            let hs = packet::parse_handshake(&body)?;
                            debug!(sid = %hs.sid, ping_interval = hs.ping_interval, "Engine.IO open");
                            heartbeat = Duration::from_millis(hs.ping_interval + hs.ping_timeout);
                            deadline = Instant::now() + heartbeat;
                            write
                                .send(Message::text(packet::encode_connect(self.auth.as_ref())))
                                .await
                                .map_err(|e| Error::WebSocketConnect(e.to_string()))?;
                        }
                        EnginePacket::Ping => {
                            trace!("Engine.IO ping");
                            deadline = Instant::now() + heartbeat;
                            write
                                .send(Message::text(packet::PONG))
                                .await
                                .map_err(|e| Error::WebSocketConnect(e.to_string()))?;
                        }
                        EnginePacket::Close => {
                            info!("server closed the Engine.IO session");
                            return Ok(());
                        }
                        EnginePacket::Pong | EnginePacket::Noop => {}
                        EnginePacket::Message(body) => match packet::decode_socket(&body) {
                            Ok(SocketPacket::Connect { sid }) => {
                                info!(sid = sid.as_deref().unwrap_or(""), "realtime connected");
                                connected = true;
                                *attempt = 0;
                                self.status_tx.send_replace(ConnectionStatus {
                                    connected: true,
                                    error: None,
                                });
                                for frame in self.rejoin(control_rx) {
                                    write
                                        .send(Message::text(frame))
                                        .await
                                        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;
                                }
                            }
                            Ok(SocketPacket::ConnectError { message }) => {
                                return Err(Error::Protocol(format!("connect refused: {message}")));
                            }
                            Ok(SocketPacket::Disconnect) => {
                                info!("server disconnected the namespace");
                                return Ok(());
                            }
                            Ok(SocketPacket::Event { name, payload }) => {
                                debug!(event = %name, "realtime event");
                                let event = RealtimeEvent::from_wire(&name, payload);
                                // No subscribers is fine: missed events are not queued.
                                let _ = self.event_tx.send(Arc::new(event));
                            }
                            Ok(SocketPacket::Ack) => {}
                            Err(e) => debug!(error = %e, "skipping undecodable Socket.IO packet"),
                        },
                    }
                }
            }
        }
    }

    /// Record the room change and produce the frame to send.
    fn apply_control(&mut self, control: Control) -> String {
        match control {
            Control::Join(id) => {
                debug!(property_id = %id, "joining property room");
                let frame = packet::encode_event(JOIN_PROPERTY, &Value::String(id.clone()));
                self.rooms.insert(id);
                frame
            }
            Control::Leave(id) => {
                debug!(property_id = %id, "leaving property room");
                let frame = packet::encode_event(LEAVE_PROPERTY, &Value::String(id.clone()));
                self.rooms.remove(&id);
                frame
            }
        }
    }

    /// Frames that restore room membership after (re)connecting. Controls
    /// queued while the socket was down are folded into the room set
    /// first so they are neither lost nor sent twice.
    fn rejoin(&mut self, control_rx: &mut mpsc::UnboundedReceiver<Control>) -> Vec<String> {
        while let Ok(control) = control_rx.try_recv() {
            match control {
                Control::Join(id) => {
                    self.rooms.insert(id);
                }
                Control::Leave(id) => {
                    self.rooms.remove(&id);
                }
            }
        }
        self.rooms
            .iter()
            .map(|id| packet::encode_event(JOIN_PROPERTY, &Value::String(id.clone())))
            .collect()
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) * (1 ± 0.25)`
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Deterministic spread seeded from the attempt number.
    let jitter_factor = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
    Duration::from_secs_f64((capped * jitter_factor).max(0.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn socket_url_is_derived_from_base() {
        let config = RealtimeConfig::new(Url::parse("https://api.innkeep.app").unwrap());
        assert_eq!(
            config.socket_url().unwrap().as_str(),
            "wss://api.innkeep.app/socket.io/?EIO=4&transport=websocket"
        );

        let config = RealtimeConfig::new(Url::parse("ws://localhost:3001/").unwrap());
        assert_eq!(
            config.socket_url().unwrap().as_str(),
            "ws://localhost:3001/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn socket_url_rejects_other_schemes() {
        let config = RealtimeConfig::new(Url::parse("ftp://example.com").unwrap());
        assert!(config.socket_url().is_err());
    }

    #[test]
    fn backoff_increases_then_caps() {
        let config = ReconnectConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            max_retries: None,
        };
        let d0 = calculate_backoff(0, &config);
        let d1 = calculate_backoff(1, &config);
        let d2 = calculate_backoff(2, &config);
        assert!(d1 > d0, "d1 ({d1:?}) should exceed d0 ({d0:?})");
        assert!(d2 > d1, "d2 ({d2:?}) should exceed d1 ({d1:?})");
        assert!(calculate_backoff(40, &config) <= Duration::from_millis(12_500));
    }

    #[test]
    fn rejoin_folds_queued_controls() {
        let (event_tx, _event_rx) = broadcast::channel(4);
        let (status_tx, _status_rx) = watch::channel(ConnectionStatus::default());
        let mut relay = Relay {
            url: Url::parse("ws://localhost").unwrap(),
            auth: None,
            reconnect: ReconnectConfig::default(),
            event_tx,
            status_tx,
            cancel: CancellationToken::new(),
            rooms: BTreeSet::from(["1".to_owned()]),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Control::Join("2".into())).unwrap();
        tx.send(Control::Leave("1".into())).unwrap();

        let frames = relay.rejoin(&mut rx);
        assert_eq!(frames, vec![r#"42["join_property","2"]"#.to_owned()]);
    }
}
