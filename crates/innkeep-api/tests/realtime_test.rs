#![allow(clippy::unwrap_used)]
// Realtime relay tests against a loopback Socket.IO-speaking server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

use innkeep_api::models::{DeviceStatus, EntityId};
use innkeep_api::{RealtimeConfig, RealtimeEvent, RealtimeHandle, ReconnectConfig};

const WAIT: Duration = Duration::from_secs(5);

/// What the fake server saw: text frames, plus `"<close>"` for a close frame.
type Seen = mpsc::UnboundedReceiver<String>;

/// Accepts one WebSocket client, completes the Engine.IO / Socket.IO
/// handshake, then pushes `events` after the first `join_property`.
async fn fake_server(events: Vec<String>) -> (Url, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("ws://{}", listener.local_addr().unwrap())).unwrap();
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(Message::text(
            r#"0{"sid":"eio-1","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#,
        ))
        .await
        .unwrap();

        let mut events = Some(events);
        while let Some(Ok(msg)) = ws.next().await {
            match msg {
                Message::Text(text) => {
                    let text = text.as_str().to_owned();
                    let _ = seen_tx.send(text.clone());
                    if text.starts_with("40") {
                        ws.send(Message::text(r#"40{"sid":"sio-1"}"#)).await.unwrap();
                    } else if text.starts_with(r#"42["join_property""#) {
                        for frame in events.take().unwrap_or_default() {
                            ws.send(Message::text(frame)).await.unwrap();
                        }
                    }
                }
                Message::Close(_) => {
                    let _ = seen_tx.send("<close>".into());
                    break;
                }
                _ => {}
            }
        }
    });

    (url, seen_rx)
}

async fn next_seen(seen: &mut Seen) -> String {
    tokio::time::timeout(WAIT, seen.recv()).await.unwrap().unwrap()
}

fn config(url: Url) -> RealtimeConfig {
    let mut config = RealtimeConfig::new(url).with_token("tok".to_string().into());
    config.reconnect = ReconnectConfig {
        initial_delay: Duration::from_millis(50),
        max_delay: Duration::from_millis(200),
        max_retries: Some(0),
    };
    config
}

async fn wait_connected(handle: &RealtimeHandle) {
    let mut status = handle.status();
    tokio::time::timeout(WAIT, status.wait_for(|s| s.connected))
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn handshake_join_event_and_single_disconnect() {
    let (url, mut seen) = fake_server(vec![
        r#"42["guest.checked_in",{"id":11,"first_name":"Ada","status":"checked_in"}]"#.into(),
        r#"42["device.status_changed",{"deviceId":"atv-2","status":"offline"}]"#.into(),
    ])
    .await;

    let handle = RealtimeHandle::connect(config(url), CancellationToken::new()).unwrap();
    let mut events = handle.subscribe();

    assert_eq!(next_seen(&mut seen).await, r#"40{"token":"tok"}"#);
    wait_connected(&handle).await;
    assert!(handle.connection_error().is_none());

    assert!(handle.join_property("12"));
    assert!(!handle.join_property("  "), "empty ids are ignored");
    assert_eq!(next_seen(&mut seen).await, r#"42["join_property","12"]"#);

    let first = tokio::time::timeout(WAIT, events.recv()).await.unwrap().unwrap();
    match first.as_ref() {
        RealtimeEvent::GuestCheckedIn(guest) => assert_eq!(guest.id, EntityId::Numeric(11)),
        other => panic!("expected GuestCheckedIn, got {other:?}"),
    }
    let second = tokio::time::timeout(WAIT, events.recv()).await.unwrap().unwrap();
    assert_eq!(
        *second,
        RealtimeEvent::DeviceStatusChanged {
            device_id: EntityId::Text("atv-2".into()),
            status: DeviceStatus::Offline,
            device_name: None,
        }
    );

    assert!(handle.disconnect(), "first disconnect closes the live socket");
    assert!(!handle.disconnect(), "second disconnect is a no-op");
    assert!(!handle.join_property("12"), "no controls after teardown");

    assert_eq!(next_seen(&mut seen).await, "41");
    assert_eq!(next_seen(&mut seen).await, "<close>");
}

#[tokio::test]
async fn never_connected_disconnect_is_a_no_op() {
    // Reserve a port, then free it so the connect is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}")).unwrap();
    let handle = RealtimeHandle::connect(config(url), CancellationToken::new()).unwrap();

    let mut status = handle.status();
    tokio::time::timeout(WAIT, status.wait_for(|s| s.error.is_some()))
        .await
        .unwrap()
        .unwrap();

    assert!(!handle.is_connected());
    assert!(!handle.join_property("12"));
    assert!(!handle.disconnect());
    assert!(!handle.disconnect());
}

#[tokio::test]
async fn connect_error_surfaces_as_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("ws://{}", listener.local_addr().unwrap())).unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(Message::text(r#"0{"sid":"x","pingInterval":25000,"pingTimeout":20000}"#))
            .await
            .unwrap();
        let _ = ws.next().await;
        ws.send(Message::text(r#"44{"message":"invalid token"}"#))
            .await
            .unwrap();
        // Hold the socket open until the client drops it.
        while ws.next().await.is_some() {}
    });

    let handle = RealtimeHandle::connect(config(url), CancellationToken::new()).unwrap();
    let mut status = handle.status();
    let state = tokio::time::timeout(WAIT, status.wait_for(|s| s.error.is_some()))
        .await
        .unwrap()
        .unwrap()
        .clone();

    assert!(!state.connected);
    assert!(state.error.unwrap().contains("invalid token"));
    assert!(!handle.disconnect());
}
