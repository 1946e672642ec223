//! Fire-and-forget crash reports.
//!
//! [`TelemetryClient::report`] posts one [`CrashReport`] from a background
//! thread and returns immediately. [`TelemetryLayer`] plugs into the tracing
//! subscriber and reports every `ERROR` event. Reports are never retried.
//!
//! The layer keeps the handles of reports still in flight. A [`TelemetryGuard`]
//! taken from it waits for them, with a deadline, when flushed or dropped, so a
//! short-lived process does not exit before its last report is posted.

use crate::constants::{APP_NAME, TELEMETRY_FLUSH_TIMEOUT_MS};
use crate::errors::TelemetryError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::field::{Field, Visit};
use tracing::{debug, warn, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Body of a crash report. Field names are the wire keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashReport {
    #[serde(rename = "Device Model")]
    pub device_model: String,
    #[serde(rename = "Device Firmware")]
    pub device_firmware: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Subsystem")]
    pub subsystem: String,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl CrashReport {
    /// Builds an error report stamped with this machine's architecture and OS.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            device_model: std::env::consts::ARCH.to_string(),
            device_firmware: std::env::consts::OS.to_string(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            subsystem: APP_NAME.to_string(),
            kind: "error".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryClient {
    endpoint: String,
    client: Client,
}

impl TelemetryClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the report and waits for the answer.
    pub fn send(&self, report: &CrashReport) -> Result<(), TelemetryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(report)
            .send()
            .map_err(TelemetryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status(status.as_u16()));
        }
        debug!("Crash report accepted with status {}", status);
        Ok(())
    }

    /// Posts the report from a background thread.
    ///
    /// The outcome is only logged. Joining the handle is optional.
    pub fn report(&self, report: CrashReport) -> JoinHandle<()> {
        let client = self.clone();
        thread::spawn(move || {
            if let Err(e) = client.send(&report) {
                warn!("{}", e);
            }
        })
    }
}

type Pending = Arc<Mutex<Vec<JoinHandle<()>>>>;

/// Tracing layer that turns `ERROR` events into crash reports.
pub struct TelemetryLayer {
    client: TelemetryClient,
    pending: Pending,
}

impl TelemetryLayer {
    pub fn new(client: TelemetryClient) -> Self {
        Self {
            client,
            pending: Arc::default(),
        }
    }

    /// A guard over the reports this layer has started.
    pub fn guard(&self) -> TelemetryGuard {
        TelemetryGuard {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<S: Subscriber> Layer<S> for TelemetryLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Our own failures are logged below ERROR, but never report them anyway.
        if *metadata.level() != Level::ERROR || metadata.target().starts_with(module_path!()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let report = CrashReport::new(
            metadata.target(),
            visitor.into_description(),
            metadata.level().to_string(),
        );
        let handle = self.client.report(report);

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }
}

/// Waits for in-flight crash reports. Dropping it flushes with the default timeout.
pub struct TelemetryGuard {
    pending: Pending,
}

impl TelemetryGuard {
    /// Joins every report that finishes before `timeout` runs out and returns
    /// how many were still running at the deadline. Those are abandoned.
    pub fn flush(&self, timeout: Duration) -> usize {
        let handles = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let deadline = Instant::now() + timeout;

        let mut abandoned = 0;
        for handle in handles {
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                abandoned += 1;
            }
        }

        if abandoned > 0 {
            warn!("{} crash reports still in flight at exit", abandoned);
        }
        abandoned
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        self.flush(Duration::from_millis(TELEMETRY_FLUSH_TIMEOUT_MS));
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn into_description(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} ({})", self.message, self.fields.join(", "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
