//! HTTP surface tests: JSON snapshot, websocket push and static files.

use futures_util::StreamExt;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use status_checker::config::ServiceConfig;
use status_checker::health::{EndpointView, StatusSnapshot};
use status_checker::{Services, Shutdown};

mod common;

struct Harness {
    addr: SocketAddr,
    services: Services,
    shutdown: Shutdown,
}

async fn start(endpoints: Vec<String>, static_dir: std::path::PathBuf) -> Harness {
    let mut config = ServiceConfig::default();
    config.storage.enabled = false;
    config.dashboard.static_dir = static_dir;
    config.subscribers.write_timeout_secs = 1;

    let services = Services::with_endpoints(config, endpoints);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = services.http_server();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Harness { addr, services, shutdown }
}

async fn next_snapshot<S>(ws: &mut S) -> StatusSnapshot
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("snapshot within timeout")
            .expect("stream open")
            .expect("valid frame");
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

#[tokio::test]
async fn test_status_json_serves_current_snapshot() {
    let up = common::url_of(common::start_status_backend(200).await);
    let down = common::url_of(common::start_status_backend(503).await);
    let harness = start(vec![up.clone(), down.clone()], common::scratch_dir()).await;

    let client = common::test_client();
    let url = format!("http://{}/status-json", harness.addr);

    let before: Vec<EndpointView> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(before.len(), 2);
    assert!(before.iter().all(|v| v.healthy && v.last_healthy == 0 && v.last_unhealthy == 0));

    let scheduler = harness.services.scheduler_with(common::test_prober(Duration::from_secs(5)));
    scheduler.run_round().await;

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let after: StatusSnapshot = response.json().await.unwrap();
    assert_eq!(after.get(&up).unwrap().response_code, 200);
    assert!(!after.get(&down).unwrap().healthy);
    assert_eq!(after.get(&down).unwrap().response_code, 503);

    harness.shutdown.trigger();
}

#[tokio::test]
async fn test_websocket_gets_initial_snapshot_then_rounds() {
    let down = common::url_of(common::start_status_backend(500).await);
    let harness = start(vec![down.clone()], common::scratch_dir()).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", harness.addr)).await.unwrap();
    let initial = next_snapshot(&mut ws).await;
    assert!(initial.get(&down).unwrap().healthy, "initial state is healthy until probed");

    // Inbound application messages are ignored.
    use futures_util::SinkExt;
    ws.send(Message::Text("hello".into())).await.unwrap();

    let scheduler = harness.services.scheduler_with(common::test_prober(Duration::from_secs(5)));
    scheduler.run_round().await;

    let pushed = next_snapshot(&mut ws).await;
    let view = pushed.get(&down).unwrap();
    assert!(!view.healthy);
    assert_eq!(view.response_code, 500);

    harness.shutdown.trigger();
}

#[tokio::test]
async fn test_disconnected_subscriber_does_not_affect_others() {
    let up = common::url_of(common::start_status_backend(200).await);
    let harness = start(vec![up.clone()], common::scratch_dir()).await;
    let ws_url = format!("ws://{}/ws", harness.addr);

    let (mut staying, _) = connect_async(ws_url.as_str()).await.unwrap();
    let (mut leaving, _) = connect_async(ws_url.as_str()).await.unwrap();
    next_snapshot(&mut staying).await;
    next_snapshot(&mut leaving).await;
    drop(leaving);

    // Give the server a moment to notice the closed socket.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let scheduler = harness.services.scheduler_with(common::test_prober(Duration::from_secs(5)));
    scheduler.run_round().await;

    let pushed = next_snapshot(&mut staying).await;
    assert_eq!(pushed.get(&up).unwrap().response_code, 200);
    assert_eq!(harness.services.broadcaster.subscriber_count(), 1);

    harness.shutdown.trigger();
}

#[tokio::test]
async fn test_static_files_served_from_dashboard_dir() {
    let dir = common::scratch_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>status</h1>").unwrap();

    let harness = start(Vec::new(), dir.clone()).await;
    let client = common::test_client();

    let index = client.get(format!("http://{}/", harness.addr)).send().await.unwrap();
    assert_eq!(index.status(), 200);
    assert_eq!(index.text().await.unwrap(), "<h1>status</h1>");

    let missing = client.get(format!("http://{}/nope.js", harness.addr)).send().await.unwrap();
    assert_eq!(missing.status(), 404);

    let empty: StatusSnapshot = client
        .get(format!("http://{}/status-json", harness.addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(empty.is_empty());

    harness.shutdown.trigger();
    std::fs::remove_dir_all(&dir).unwrap_or_default();
}
