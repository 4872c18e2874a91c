#![allow(clippy::unwrap_used)]
// Console scenarios against a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::broadcast;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use innkeep_core::model::ActivityInput;
use innkeep_core::{
    AuthState, Console, ConsoleConfig, CoreError, Direction, EntityId, ImageForm,
    MemorySessionStore, Notification, NotificationLevel, Session, SessionStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn rejected(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": false, "message": message }))
}

fn config(server: &MockServer) -> ConsoleConfig {
    let mut config = ConsoleConfig::new(Url::parse(&server.uri()).unwrap());
    config.realtime_enabled = false;
    config.device_poll_interval = Duration::ZERO;
    config
}

fn stored_session() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_session(Session::new(
        "test-token".to_string().into(),
        None,
    )))
}

async fn mount_verify(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ok(json!({ "user": { "id": 1, "email": "ops@example.com" } })))
        .mount(server)
        .await;
}

/// An authenticated console plus a notification receiver.
async fn setup() -> (MockServer, Console, broadcast::Receiver<Notification>) {
    let server = MockServer::start().await;
    mount_verify(&server).await;
    let console = Console::new(config(&server), stored_session()).unwrap();
    let state = console.authenticate().await.unwrap();
    assert!(matches!(state, AuthState::Authenticated(_)));
    let rx = console.notifications();
    (server, console, rx)
}

fn activity(id: i64, title: &str, order: u32, active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "property_id": 1,
        "title": title,
        "activity_type": "outdoor",
        "display_order": order,
        "is_active": active
    })
}

async fn mount_activities(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .respond_with(ok(items))
        .mount(server)
        .await;
}

fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

// ── Auth gate ───────────────────────────────────────────────────────

#[tokio::test]
async fn no_stored_token_requires_login_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ok(json!({ "id": 1 })))
        .expect(0)
        .mount(&server)
        .await;

    let console = Console::new(config(&server), Arc::new(MemorySessionStore::new())).unwrap();
    assert!(matches!(
        console.authenticate().await.unwrap(),
        AuthState::LoginRequired
    ));
}

#[tokio::test]
async fn accepted_token_authenticates() {
    let server = MockServer::start().await;
    mount_verify(&server).await;
    let sessions = stored_session();

    let console = Console::new(config(&server), sessions.clone()).unwrap();
    let AuthState::Authenticated(user) = console.authenticate().await.unwrap() else {
        panic!("expected an authenticated session");
    };
    assert_eq!(user.email.as_deref(), Some("ops@example.com"));
    assert!(console.client().is_authenticated());
    // The verified user is cached alongside the token.
    assert!(sessions.load().unwrap().unwrap().user.is_some());
}

#[tokio::test]
async fn rejected_token_clears_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "message": "Token expired" })),
        )
        .mount(&server)
        .await;
    let sessions = stored_session();

    let console = Console::new(config(&server), sessions.clone()).unwrap();
    assert!(matches!(
        console.authenticate().await.unwrap(),
        AuthState::LoginRequired
    ));
    assert!(sessions.load().unwrap().is_none());
    assert!(!console.client().is_authenticated());
}

#[tokio::test]
async fn login_persists_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ok(json!({
            "token": "fresh",
            "user": { "id": 3, "email": "ops@example.com" }
        })))
        .mount(&server)
        .await;
    let sessions = Arc::new(MemorySessionStore::new());
    let console = Console::new(config(&server), sessions.clone()).unwrap();
    let mut rx = console.notifications();

    let secret = "hunter2".to_string().into();
    console.login("ops@example.com", &secret).await.unwrap();

    assert!(sessions.load().unwrap().is_some());
    assert!(console.client().is_authenticated());
    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
}

// ── Toggle round trips ──────────────────────────────────────────────

#[tokio::test]
async fn toggle_twice_round_trips_through_the_server() {
    let (server, console, mut rx) = setup().await;
    mount_activities(&server, json!([activity(1, "Hike", 0, true)])).await;

    Mock::given(method("PATCH"))
        .and(path("/api/activities/1/toggle"))
        .and(body_json(json!({ "is_active": false })))
        .respond_with(ok(activity(1, "Hike", 0, false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/activities/1/toggle"))
        .and(body_json(json!({ "is_active": true })))
        .respond_with(ok(activity(1, "Hike", 0, true)))
        .expect(1)
        .mount(&server)
        .await;

    let id = EntityId::from(1);
    console.list_activities(None).await.unwrap();

    let first = console.toggle_activity(&id).await.unwrap();
    assert!(!first.is_active);
    assert!(!console.store().activities().get(&id).unwrap().is_active);

    let second = console.toggle_activity(&id).await.unwrap();
    assert!(second.is_active);
    assert_eq!(console.store().activities().pending_operations(), 0);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.level == NotificationLevel::Success));
}

#[tokio::test]
async fn failed_toggle_rolls_back() {
    let (server, console, mut rx) = setup().await;
    mount_activities(&server, json!([activity(1, "Hike", 0, true)])).await;

    Mock::given(method("PATCH"))
        .and(path("/api/activities/1/toggle"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let id = EntityId::from(1);
    console.list_activities(None).await.unwrap();

    assert!(console.toggle_activity(&id).await.is_err());
    assert!(console.store().activities().get(&id).unwrap().is_active);
    assert_eq!(console.store().activities().pending_operations(), 0);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

// ── Reorder ─────────────────────────────────────────────────────────

#[tokio::test]
async fn moving_an_activity_up_patches_its_new_index() {
    let (server, console, _rx) = setup().await;
    mount_activities(
        &server,
        json!([
            activity(1, "A", 0, true),
            activity(2, "B", 1, true),
            activity(3, "C", 2, true)
        ]),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path("/api/activities/2/order"))
        .and(body_json(json!({ "display_order": 0 })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    console.list_activities(None).await.unwrap();
    let list = console
        .move_activity(&EntityId::from(2), Direction::Up)
        .await
        .unwrap();

    let titles: Vec<_> = list.iter().map(|a| a.title.as_str()).collect();
    let orders: Vec<_> = list.iter().map(|a| a.display_order).collect();
    assert_eq!(titles, ["B", "A", "C"]);
    assert_eq!(orders, [0, 1, 2]);
}

#[tokio::test]
async fn moving_a_streaming_service_puts_the_full_set() {
    let (server, console, _rx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/streaming-services"))
        .respond_with(ok(json!([
            { "id": 10, "property_id": 1, "service_name": "Netflix", "display_order": 0 },
            { "id": 11, "property_id": 1, "service_name": "Spotify", "display_order": 1 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/streaming-services/reorder"))
        .and(body_json(json!({ "items": [
            { "id": 11, "display_order": 0 },
            { "id": 10, "display_order": 1 }
        ] })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    console.list_streaming(None).await.unwrap();
    let list = console
        .move_streaming(&EntityId::from(10), Direction::Down)
        .await
        .unwrap();
    assert_eq!(list[0].service_name, "Spotify");
}

#[tokio::test]
async fn failed_reorder_restores_every_touched_row() {
    let (server, console, _rx) = setup().await;
    mount_activities(
        &server,
        json!([activity(1, "A", 0, true), activity(2, "B", 1, true)]),
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/api/activities/2/order"))
        .respond_with(rejected("Order locked"))
        .mount(&server)
        .await;

    console.list_activities(None).await.unwrap();
    let err = console
        .move_activity(&EntityId::from(2), Direction::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));

    let store = console.store().activities();
    assert_eq!(store.get(&EntityId::from(1)).unwrap().display_order, 0);
    assert_eq!(store.get(&EntityId::from(2)).unwrap().display_order, 1);
}

// ── Error passthrough ───────────────────────────────────────────────

#[tokio::test]
async fn server_message_is_the_single_error_notification() {
    let (server, console, mut rx) = setup().await;
    mount_activities(&server, json!([activity(1, "Hike", 0, true)])).await;
    Mock::given(method("PATCH"))
        .and(path("/api/activities/1/toggle"))
        .respond_with(rejected("X"))
        .mount(&server)
        .await;

    let id = EntityId::from(1);
    console.list_activities(None).await.unwrap();
    let before = console.store().activities().get(&id).unwrap();

    let err = console.toggle_activity(&id).await.unwrap_err();
    assert_eq!(err.user_message(), "X");

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].message, "X");
    assert_eq!(console.store().activities().get(&id).unwrap(), before);
}

#[tokio::test]
async fn failed_delete_puts_the_row_back() {
    let (server, console, mut rx) = setup().await;
    mount_activities(&server, json!([activity(1, "Hike", 0, true)])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/activities/1"))
        .respond_with(rejected("Activity is in use"))
        .mount(&server)
        .await;

    console.list_activities(None).await.unwrap();
    assert!(console.delete_activity(&EntityId::from(1)).await.is_err());
    assert_eq!(console.store().activities().len(), 1);
    assert_eq!(drain(&mut rx)[0].message, "Activity is in use");
}

#[tokio::test]
async fn delete_removes_the_row_without_refetch() {
    let (server, console, _rx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .respond_with(ok(json!([activity(1, "Hike", 0, true)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/activities/1"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    console.list_activities(None).await.unwrap();
    console.delete_activity(&EntityId::from(1)).await.unwrap();
    assert!(console.store().activities().is_empty());
}

// ── Image-mode exclusivity ──────────────────────────────────────────

#[tokio::test]
async fn only_the_active_image_mode_is_submitted() {
    let (server, console, _rx) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pool.png");
    std::fs::write(&file, b"\x89PNG\r\n\x1a\n").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/check-image"))
        .respond_with(ok(json!({ "accessible": true })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/upload/image"))
        .respond_with(ok(json!({ "url": "/uploads/pool.png", "filename": "pool.png" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .and(body_partial_json(json!({ "image_url": "/uploads/pool.png" })))
        .respond_with(ok(json!({
            "id": 9,
            "property_id": 1,
            "title": "Pool",
            "image_url": "/uploads/pool.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = ImageForm::new();
    form.url("https://example.com/stale.jpg", false);
    form.upload(&file);

    let input = ActivityInput {
        property_id: Some(EntityId::from(1)),
        title: Some("Pool".into()),
        ..ActivityInput::default()
    };
    let created = console.create_activity(input, &form).await.unwrap();
    assert_eq!(created.image_url.as_deref(), Some("/uploads/pool.png"));
}

#[tokio::test]
async fn url_serving_a_page_is_not_accepted_as_an_image() {
    let (server, console, mut rx) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/check-image"))
        .and(body_json(json!({ "url": "https://example.com/landing-page" })))
        .respond_with(ok(json!({ "accessible": true, "content_type": "text/html" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/images/import"))
        .respond_with(ok(json!({ "url": "/uploads/x.html" })))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = ImageForm::new();
    form.url("https://example.com/landing-page", true);
    let err = console.resolve_image(&form).await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }), "{err:?}");

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert!(notes[0].message.contains("text/html"));
}

#[tokio::test]
async fn oversized_remote_image_is_rejected() {
    let (server, console, _rx) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/check-image"))
        .respond_with(ok(json!({
            "accessible": true,
            "content_type": "image/jpeg",
            "size": 11 * 1024 * 1024
        })))
        .mount(&server)
        .await;

    let mut form = ImageForm::new();
    form.url("https://example.com/poster.jpg", false);
    assert!(console.resolve_image(&form).await.is_err());
}

#[tokio::test]
async fn proxied_fetch_returns_image_bytes() {
    let (server, console, _rx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/proxy/image"))
        .and(query_param("url", "https://cdn.example.com/a.gif"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/gif")
                .set_body_bytes(b"GIF89a".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/proxy/image"))
        .and(query_param("url", "https://example.com/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(b"<html></html>".to_vec()),
        )
        .mount(&server)
        .await;

    let image = console.fetch_image("https://cdn.example.com/a.gif").await.unwrap();
    assert_eq!(image.content_type.as_deref(), Some("image/gif"));
    assert_eq!(image.data, b"GIF89a");

    let err = console.fetch_image("https://example.com/").await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }), "{err:?}");
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn command_failure_reports_server_text_once() {
    let (server, console, mut rx) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/mdm/devices/atv-1/restart"))
        .respond_with(rejected("Device is not supervised"))
        .expect(1)
        .mount(&server)
        .await;

    let err = console
        .restart_device(&EntityId::from("atv-1"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Device is not supervised");
    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "Device is not supervised");
}

#[tokio::test]
async fn oneshot_runs_without_relay() {
    let server = MockServer::start().await;
    mount_verify(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/mdm/stats"))
        .respond_with(ok(json!({ "total_devices": 4, "online_devices": 3 })))
        .mount(&server)
        .await;

    let mut cfg = config(&server);
    cfg.realtime_enabled = true;
    let stats = Console::oneshot(cfg, stored_session(), |console| async move {
        assert!(console.relay_status().await.is_none());
        console.mdm_stats().await
    })
    .await
    .unwrap();
    assert_eq!(stats.total_devices, 4);
}
