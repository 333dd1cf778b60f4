//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use reporting_details::config::{ApiConfigSettings, RetryConfig};

pub const API_KEY: &str = "test-subscription-key";

/// Cache document with two stations for `00595780131`, the first disabled.
pub const CACHE_BODY: &str = r#"{
    "stations": {
        "S0": {"station_code": "S0", "enabled": false, "broker_code": "B0", "password": "P0"},
        "S1": {"station_code": "S1", "enabled": true, "broker_code": "B1", "password": "P1"},
        "S2": {"station_code": "S2", "enabled": true, "broker_code": "B2", "password": "P2"}
    },
    "creditorInstitutionStations": {
        "a": {"creditor_institution_code": "00595780131", "station_code": "S0"},
        "b": {"creditor_institution_code": "00595780131", "station_code": "S1"},
        "c": {"creditor_institution_code": "00595780131", "station_code": "S2"},
        "d": {"creditor_institution_code": "77777777777", "station_code": "S0"}
    }
}"#;

/// Request heads seen by a mock backend, in arrival order.
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<String>>>);

impl Recorded {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn heads(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the zero-based request index and returns status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Recorded)
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = Recorded::default();
    let f = Arc::new(f);

    let log = recorded.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let f = f.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                let index = {
                    let mut heads = log.0.lock().unwrap();
                    heads.push(head);
                    heads.len() - 1
                };

                let (status, body) = f(index).await;
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    (addr, recorded)
}

/// Mock backend answering every request with the same status and body.
pub async fn start_mock_backend(status: u16, body: &'static str) -> (SocketAddr, Recorded) {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

pub fn settings(addr: SocketAddr) -> ApiConfigSettings {
    ApiConfigSettings {
        host: format!("http://{addr}"),
        api_key: API_KEY.to_string(),
        connect_timeout_millis: 1_000,
        read_timeout_millis: 2_000,
        ..Default::default()
    }
}

/// Fast backoff for tests: 20ms, 30ms, ... capped at 50ms, 400ms budget.
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        enabled: true,
        initial_interval_millis: 20,
        max_elapsed_time_millis: 400,
        max_interval_millis: 50,
        multiplier: 1.5,
        randomization_factor: 0.0,
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
