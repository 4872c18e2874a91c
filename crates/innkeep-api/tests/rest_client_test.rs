#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use innkeep_api::models::{
    CommandPriority, CommandRequest, EntityId, GuestStatus, KioskEnableRequest, OrderEntry,
    ReturnTimeout,
};
use innkeep_api::{ApiClient, Error, ImageUpload};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url)
        .with_token("test-token".to_string().into());
    (server, client)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter2" })))
        .respond_with(ok(json!({
            "token": "abc",
            "user": { "id": 1, "email": "ops@example.com", "role": "admin" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    let data = client.login("ops@example.com", &secret).await.unwrap();
    assert_eq!(data.token, "abc");
    assert_eq!(data.user.role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_verify_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ok(json!({ "user": { "id": 7, "username": "frontdesk" } })))
        .mount(&server)
        .await;

    let user = client.verify().await.unwrap();
    assert_eq!(user.id, EntityId::Numeric(7));
    assert_eq!(user.name.as_deref(), Some("frontdesk"));
}

#[tokio::test]
async fn test_verify_401_is_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let err = client.verify().await.unwrap_err();
    assert!(err.is_auth_expired(), "expected auth error, got: {err:?}");
    assert!(matches!(err, Error::Unauthorized { ref message } if message == "Token expired"));
}

#[tokio::test]
async fn test_verify_without_token_never_hits_network() {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());

    let err = client.verify().await.unwrap_err();
    assert!(matches!(err, Error::MissingToken));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_success_false_passes_message_through() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/activities/4/toggle"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Activity is locked" })),
        )
        .mount(&server)
        .await;

    let err = client
        .toggle_activity(&EntityId::Numeric(4), false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Activity is locked");
}

#[tokio::test]
async fn test_validation_errors_are_summarized() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/guests"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [
                { "path": "email", "msg": "Invalid email" },
                { "path": "check_in_date", "msg": "Required" }
            ]
        })))
        .mount(&server)
        .await;

    let err = client
        .create_guest(&innkeep_api::models::GuestInput::default())
        .await
        .unwrap_err();
    match err {
        Error::Rejected { message, details } => {
            assert_eq!(message, "email: Invalid email; check_in_date: Required");
            assert_eq!(details.len(), 2);
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/properties"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client.list_properties().await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 502, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_missing_data_is_reported() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mdm/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let err = client.mdm_stats().await.unwrap_err();
    assert!(matches!(err, Error::MissingData { .. }));
}

// ── Resources ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_guests_scoped_by_property() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/guests"))
        .and(query_param("property_id", "3"))
        .respond_with(ok(json!([
            { "id": 1, "first_name": "Ada", "status": "checked_in" },
            { "id": "2", "name": "Grace", "status": "reserved" }
        ])))
        .mount(&server)
        .await;

    let guests = client.list_guests(Some(&EntityId::Numeric(3))).await.unwrap();
    assert_eq!(guests.len(), 2);
    assert_eq!(guests[1].id, EntityId::Numeric(2));
    assert_eq!(guests[0].status, GuestStatus::CheckedIn);
}

#[tokio::test]
async fn test_set_guest_status_patch_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/guests/9/status"))
        .and(body_json(json!({ "status": "checked_out" })))
        .respond_with(ok(json!({ "id": 9, "status": "checked_out" })))
        .mount(&server)
        .await;

    let echo = client
        .set_guest_status(&EntityId::Numeric(9), GuestStatus::CheckedOut)
        .await
        .unwrap();
    assert_eq!(echo.unwrap().status, GuestStatus::CheckedOut);
}

#[tokio::test]
async fn test_move_activity_sends_single_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/activities/12/order"))
        .and(body_json(json!({ "display_order": 0 })))
        .respond_with(ok(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client.move_activity(&EntityId::Numeric(12), 0).await.unwrap();
}

#[tokio::test]
async fn test_reorder_streaming_sends_full_set() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/streaming-services/reorder"))
        .and(body_json(json!({ "items": [
            { "id": 5, "display_order": 0 },
            { "id": 4, "display_order": 1 }
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let items = vec![
        OrderEntry { id: EntityId::Numeric(5), display_order: 0 },
        OrderEntry { id: EntityId::Numeric(4), display_order: 1 },
    ];
    client.reorder_streaming(&items).await.unwrap();
}

#[tokio::test]
async fn test_delete_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/dining/31"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_dining(&EntityId::Numeric(31)).await.unwrap();
}

// ── Images ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_image_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/upload/image"))
        .respond_with(ok(json!({ "url": "/uploads/lake.png" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("lake.png");
    std::fs::write(&file, [0x89, b'P', b'N', b'G']).unwrap();

    let upload = ImageUpload::from_path(&file).await.unwrap();
    assert_eq!(upload.content_type, "image/png");

    let stored = client.upload_image(upload).await.unwrap();
    assert_eq!(stored.url, "/uploads/lake.png");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_check_image_reports_type_and_size() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/check-image"))
        .and(body_json(json!({ "url": "https://cdn.example.com/a.jpg" })))
        .respond_with(ok(json!({ "accessible": true, "contentType": "image/jpeg", "size": 2048 })))
        .mount(&server)
        .await;

    let check = client.check_image("https://cdn.example.com/a.jpg").await.unwrap();
    assert!(check.accessible);
    assert_eq!(check.content_type.as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn test_proxy_image_returns_raw_bytes() {
    let (server, client) = setup().await;

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

    let (content_type, bytes) = client
        .proxy_image("https://cdn.example.com/a.gif")
        .await
        .unwrap();
    assert_eq!(content_type.as_deref(), Some("image/gif"));
    assert_eq!(&bytes[..], b"GIF89a");
}

// ── MDM ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_send_command_is_camel_case() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/mdm/devices/atv-1/commands"))
        .and(body_json(json!({
            "commandType": "DeviceInformation",
            "payload": {},
            "priority": "normal"
        })))
        .respond_with(ok(json!({ "id": 99, "command_type": "DeviceInformation", "status": "pending" })))
        .mount(&server)
        .await;

    let request = CommandRequest {
        command_type: "DeviceInformation".into(),
        payload: json!({}),
        priority: CommandPriority::Normal,
    };
    let queued = client
        .send_command(&EntityId::from("atv-1"), &request)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(queued.id, EntityId::Numeric(99));
}

#[tokio::test]
async fn test_enable_kiosk_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/mdm/devices/5/kiosk/enable"))
        .and(body_json(json!({
            "mode": "custom",
            "allowedApps": ["com.netflix.Netflix"],
            "returnTimeout": 1800
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let request = KioskEnableRequest {
        mode: "custom".into(),
        allowed_apps: vec!["com.netflix.Netflix".into()],
        return_timeout: ReturnTimeout::Minutes30,
    };
    client
        .enable_kiosk(&EntityId::Numeric(5), &request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_command_failure_carries_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/mdm/devices/5/restart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Device not supervised" })),
        )
        .mount(&server)
        .await;

    let err = client.restart_device(&EntityId::Numeric(5)).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Device not supervised"));
}

#[tokio::test]
async fn test_alerts_keep_server_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mdm/alerts"))
        .respond_with(ok(json!([
            { "id": 3, "title": "Low battery", "severity": "warning" },
            { "id": 1, "title": "Offline", "severity": "critical", "resolved": true }
        ])))
        .mount(&server)
        .await;

    let alerts = client.list_alerts().await.unwrap();
    let ids: Vec<_> = alerts.iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec![EntityId::Numeric(3), EntityId::Numeric(1)]);
    assert!(alerts[1].resolved);
}
