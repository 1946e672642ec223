use mockito::{Matcher, Server};
use quill::errors::TelemetryError;
use quill::telemetry::{CrashReport, TelemetryClient, TelemetryLayer};
use serde_json::json;
use std::time::Duration;
use tracing_subscriber::prelude::*;

#[test]
fn test_report_posts_json() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/report")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "Title": "quill::db",
            "Description": "disk full",
            "Category": "ERROR",
            "Subsystem": "quill",
            "Type": "error"
        })))
        .with_status(201)
        .create();

    let client = TelemetryClient::new(format!("{}/report", server.url()));
    client
        .report(CrashReport::new("quill::db", "disk full", "ERROR"))
        .join()
        .unwrap();
    mock.assert();
}

#[test]
fn test_rejected_report_is_an_error() {
    let mut server = Server::new();
    let _mock = server.mock("POST", "/report").with_status(503).create();

    let client = TelemetryClient::new(format!("{}/report", server.url()));
    let result = client.send(&CrashReport::new("t", "d", "c"));
    assert!(matches!(result, Err(TelemetryError::Status(503))));
}

#[test]
fn test_report_failure_does_not_panic() {
    let client = TelemetryClient::new("http://127.0.0.1:9/report");
    assert!(client
        .report(CrashReport::new("t", "d", "c"))
        .join()
        .is_ok());
}

#[test]
fn test_layer_reports_error_events_only() {
    let mut server = Server::new();
    let error_mock = server
        .mock("POST", "/report")
        .match_body(Matcher::PartialJson(json!({
            "Title": "quill::db",
            "Description": "disk full (table=entries)",
            "Category": "ERROR"
        })))
        .with_status(200)
        .expect(1)
        .create();
    let warn_mock = server
        .mock("POST", "/report")
        .match_body(Matcher::PartialJson(json!({ "Description": "slow query" })))
        .with_status(200)
        .expect(0)
        .create();

    let layer = TelemetryLayer::new(TelemetryClient::new(format!("{}/report", server.url())));
    let guard = layer.guard();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: "quill::db", "slow query");
        tracing::error!(target: "quill::db", table = "entries", "disk full");
    });

    assert_eq!(guard.flush(Duration::from_secs(5)), 0);
    error_mock.assert();
    warn_mock.assert();
}
