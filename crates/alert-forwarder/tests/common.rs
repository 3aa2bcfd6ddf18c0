#![allow(dead_code)]

use axum::extract::State;
use axum::http::{
    header::{CONTENT_TYPE, USER_AGENT},
    HeaderMap, HeaderName, StatusCode,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request observed by the IngestServer.
#[derive(Debug, Clone)]
pub struct Received {
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub body: serde_json::Value,
}

struct Behavior {
    status: StatusCode,
    delay: Duration,
    received: Arc<Mutex<Vec<Received>>>,
}

/// IngestServer stands in for the event-ingestion service.
/// It records each POST to `/zabbix/events` and replies with a fixed status
/// and a body of `ingest replied <status>`, after an optional delay.
pub struct IngestServer {
    pub addr: std::net::SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl IngestServer {
    pub async fn start(status: u16) -> Self {
        Self::start_with_delay(status, Duration::ZERO).await
    }

    pub async fn start_with_delay(status: u16, delay: Duration) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let behavior = Arc::new(Behavior {
            status: StatusCode::from_u16(status).expect("valid status code"),
            delay,
            received: received.clone(),
        });

        let router = axum::Router::new()
            .route("/zabbix/events", axum::routing::post(ingest))
            .with_state(behavior);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test server");
        let addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        IngestServer {
            addr,
            received,
            _shutdown_tx: shutdown_tx,
        }
    }

    /// URL of the events endpoint.
    pub fn endpoint(&self) -> url::Url {
        format!("http://{}/zabbix/events", self.addr)
            .parse()
            .expect("valid URL")
    }

    /// URL of a path the server doesn't route.
    pub fn missing_endpoint(&self) -> url::Url {
        format!("http://{}/not/here", self.addr)
            .parse()
            .expect("valid URL")
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn ingest(
    State(behavior): State<Arc<Behavior>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    behavior.received.lock().unwrap().push(Received {
        content_type: header(CONTENT_TYPE),
        user_agent: header(USER_AGENT),
        body: serde_json::from_str(&body).expect("request body must be JSON"),
    });
    tokio::time::sleep(behavior.delay).await;

    (
        behavior.status,
        format!("ingest replied {}", behavior.status.as_u16()),
    )
}

/// A URL on which nothing is listening.
pub async fn refused_endpoint() -> url::Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("failed to get local addr");
    drop(listener);

    format!("http://{addr}/zabbix/events")
        .parse()
        .expect("valid URL")
}

/// A URL whose server answers with `status`, then hangs up
/// before sending the response body it promised.
pub async fn truncated_endpoint(status: u16) -> url::Url {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("failed to get local addr");

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("failed to accept");

        // Consume the whole request (headers and JSON body) before replying.
        let mut request = Vec::new();
        let mut chunk = [0; 4096];
        while !(request.windows(4).any(|w| w == b"\r\n\r\n") && request.ends_with(b"}")) {
            match socket.read(&mut chunk).await.expect("failed to read request") {
                0 => break,
                n => request.extend_from_slice(&chunk[..n]),
            }
        }

        let head = format!("HTTP/1.1 {status} Whatever\r\ncontent-length: 64\r\n\r\npartial");
        socket
            .write_all(head.as_bytes())
            .await
            .expect("failed to write response");
        _ = socket.shutdown().await;
    });

    format!("http://{addr}/zabbix/events")
        .parse()
        .expect("valid URL")
}

/// Context bindings for every canonical alert field.
pub fn full_alert() -> Vec<(&'static str, &'static str)> {
    vec![
        ("event_id", "123"),
        ("event_status", "PROBLEM"),
        ("event_severity", "High"),
        ("host_id", "10770"),
        ("host_name", "srv01"),
        ("host_ip", "192.168.1.11"),
        ("trigger_id", "24011"),
        ("trigger_name", "Camera is offline"),
        ("trigger_description", "Camera is offline"),
        ("timestamp", "2026.01.02T22:15:31Z"),
    ]
}
