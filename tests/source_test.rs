//! Data source tests: local files, a throwaway HTTP server and the refresh worker

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use telemetry_dashboard::analysis::AnalyzerError;
use telemetry_dashboard::source::{refresh_once, run_cycle, run_refresh_worker, DataFetcher, DataSource, FetchError};
use telemetry_dashboard::types::{RefreshError, RefreshReason};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(5);

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/measurements.json")
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("telemetry-dashboard-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

/// 在本地端口上应答一次 HTTP 请求，返回请求地址
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = socket.read(&mut buf).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{}/assets/data.json", addr)
}

// ============================================================================
// FILE SOURCE
// ============================================================================

#[tokio::test]
async fn test_file_source_runs_full_refresh() {
    let fetcher = DataFetcher::new(DataSource::File(fixture_path()), TIMEOUT).unwrap();

    let analysis = refresh_once(&fetcher).await.unwrap();
    assert_eq!(analysis.record_count(), 12);
    assert_eq!(analysis.total_anomalies(), 2);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("telemetry-dashboard-does-not-exist.json");
    let fetcher = DataFetcher::new(DataSource::File(path.clone()), TIMEOUT).unwrap();

    match fetcher.fetch_payload().await {
        Err(FetchError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let path = temp_file("broken.json", "[{\"measurementNumber\": 1,");
    let fetcher = DataFetcher::new(DataSource::File(path.clone()), TIMEOUT).unwrap();

    let err = fetcher.fetch_payload().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }), "{:?}", err);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_object_payload_is_shape_error() {
    let path = temp_file("object.json", "{\"measurements\": []}");
    let fetcher = DataFetcher::new(DataSource::File(path.clone()), TIMEOUT).unwrap();

    match refresh_once(&fetcher).await {
        Err(RefreshError::Analyze(AnalyzerError::InvalidInputShape { found })) => assert_eq!(found, "object"),
        other => panic!("expected InvalidInputShape, got {:?}", other),
    }

    let _ = std::fs::remove_file(path);
}

// ============================================================================
// HTTP SOURCE
// ============================================================================

#[tokio::test]
async fn test_http_source_fetches_array() {
    let url = serve_once(
        "200 OK",
        r#"[{"measurementNumber": 1, "data": {"acc": {"x": 8192, "y": 0, "z": 0}}},
            {"measurementNumber": 2, "data": {"acc": {"x": 0, "y": 0, "z": 0}}}]"#,
    )
    .await;
    let fetcher = DataFetcher::new(DataSource::parse(&url), TIMEOUT).unwrap();

    let analysis = refresh_once(&fetcher).await.unwrap();
    assert_eq!(analysis.labels, vec!["Measurement 1", "Measurement 2"]);
    assert_eq!(analysis.vibration.values, vec![1.0, 0.0]);
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let url = serve_once("404 Not Found", "{}").await;
    let fetcher = DataFetcher::new(DataSource::parse(&url), TIMEOUT).unwrap();

    match fetcher.fetch_payload().await {
        Err(FetchError::Status { status, url: reported }) => {
            assert_eq!(status, 404);
            assert_eq!(reported, url);
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_cycle_reports_reason_and_failure() {
    let url = serve_once("500 Internal Server Error", "").await;
    let fetcher = DataFetcher::new(DataSource::parse(&url), TIMEOUT).unwrap();

    let result = run_cycle(&fetcher, RefreshReason::Scheduled).await;
    assert_eq!(result.reason, RefreshReason::Scheduled);
    assert!(!result.is_success());
    assert!(matches!(result.outcome, Err(RefreshError::Fetch(FetchError::Status { status: 500, .. }))));
}

// ============================================================================
// WORKER THREAD
// ============================================================================

#[test]
fn test_worker_answers_requests_until_disconnected() {
    let fetcher = DataFetcher::new(DataSource::File(fixture_path()), TIMEOUT).unwrap();
    let (request_sender, request_receiver) = crossbeam_channel::bounded(4);
    let (result_sender, result_receiver) = crossbeam_channel::bounded(4);
    let shutdown = Arc::new(AtomicBool::new(false));

    let worker_shutdown = Arc::clone(&shutdown);
    let handle = thread::spawn(move || {
        run_refresh_worker(fetcher, request_receiver, result_sender, worker_shutdown).is_ok()
    });

    request_sender.send(RefreshReason::Manual).unwrap();
    let result = result_receiver.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(result.reason, RefreshReason::Manual);
    assert_eq!(result.outcome.unwrap().record_count(), 12);

    drop(request_sender);
    assert!(handle.join().unwrap());
    assert!(!shutdown.load(Ordering::Relaxed));
}

#[test]
fn test_worker_stops_on_shutdown_signal() {
    let fetcher = DataFetcher::new(DataSource::File(fixture_path()), TIMEOUT).unwrap();
    let (_request_sender, request_receiver) = crossbeam_channel::bounded::<RefreshReason>(4);
    let (result_sender, _result_receiver) = crossbeam_channel::bounded(4);
    let shutdown = Arc::new(AtomicBool::new(false));

    let worker_shutdown = Arc::clone(&shutdown);
    let handle = thread::spawn(move || {
        run_refresh_worker(fetcher, request_receiver, result_sender, worker_shutdown).is_ok()
    });

    shutdown.store(true, Ordering::Relaxed);
    assert!(handle.join().unwrap());
}
