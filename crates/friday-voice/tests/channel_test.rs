use axum::{http::header::CONTENT_TYPE, http::StatusCode, routing::post, Json, Router};
use friday_voice::{Channel, LiveKitChannel, LiveKitConfig, RoomInputOptions, VoiceError, VoiceService};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ROOM_SERVICE: &str = "/twirp/livekit.RoomService";

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// An empty protobuf body decodes to the default message.
async fn empty_ok() -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], Vec<u8>) {
    (StatusCode::OK, [(CONTENT_TYPE, "application/protobuf")], Vec::new())
}

fn channel(base_url: &str) -> LiveKitChannel {
    let service = VoiceService::new(LiveKitConfig::new(base_url, "devkey", "devsecret"));
    LiveKitChannel::new(Arc::new(service), "friday-room", "friday-assistant", "Friday")
}

#[tokio::test]
async fn test_connect_fails_when_participant_listing_is_rejected() {
    let app = Router::new()
        .route(&format!("{}/CreateRoom", ROOM_SERVICE), post(empty_ok))
        .route(
            &format!("{}/ListParticipants", ROOM_SERVICE),
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"code": "unauthenticated", "msg": "invalid token"})),
                )
            }),
        );
    let base_url = spawn(app).await;

    let mut channel = channel(&base_url);
    match channel.connect(&RoomInputOptions::default()).await {
        Err(VoiceError::RoomService(msg)) => {
            assert!(msg.contains("invalid token"), "unexpected message: {}", msg)
        }
        other => panic!("expected RoomService error, got {:?}", other),
    }
    assert!(!channel.is_connected());
}

#[tokio::test]
async fn test_connect_then_publish_reply() {
    let sent = Arc::new(AtomicUsize::new(0));
    let counter = sent.clone();
    let app = Router::new()
        .route(&format!("{}/CreateRoom", ROOM_SERVICE), post(empty_ok))
        .route(&format!("{}/ListParticipants", ROOM_SERVICE), post(empty_ok))
        .route(
            &format!("{}/SendData", ROOM_SERVICE),
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                empty_ok()
            }),
        );
    let base_url = spawn(app).await;

    let mut channel = channel(&base_url);
    channel.connect(&RoomInputOptions::default()).await.unwrap();
    assert!(channel.is_connected());

    channel
        .publish_reply("Good evening, sir.", Some(&[0, 1, 2, 3]))
        .await
        .unwrap();
    assert_eq!(sent.load(Ordering::SeqCst), 1);

    channel.disconnect().await;
    assert!(!channel.is_connected());
}
