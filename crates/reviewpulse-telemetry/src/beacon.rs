//! HTTP beacon sink
//!
//! Each record is serialized to JSON and sent as a GET request carrying
//! `data=<json>` and a cache-busting `_=<millis>` query parameter. Records
//! are handed to a background task over a channel, so `emit` never waits on
//! the network. Delivery is at-most-once: failures are logged and dropped.

use crate::event::TelemetryEvent;
use crate::sink::TelemetrySink;
use parking_lot::Mutex;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Per-request budget for a single beacon
pub const DEFAULT_BEACON_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends telemetry records to a collection endpoint
pub struct BeaconSink {
    endpoint: String,
    sender: Mutex<Option<mpsc::UnboundedSender<TelemetryEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BeaconSink {
    /// Start a beacon worker for `endpoint`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_BEACON_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(endpoint, client)
    }

    /// Start a beacon worker using a prepared HTTP client
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        let endpoint = endpoint.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(client, endpoint.clone(), receiver));

        debug!("Telemetry beacon started for {}", endpoint);

        Self {
            endpoint,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Stop accepting records and wait for queued ones to be sent
    pub async fn close(&self) {
        self.sender.lock().take();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!("Telemetry beacon worker ended abnormally: {}", e);
            }
        }
    }
}

impl TelemetrySink for BeaconSink {
    fn emit(&self, event: TelemetryEvent) {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(sender) => {
                if sender.send(event).is_err() {
                    debug!("Telemetry beacon worker is gone, record dropped");
                }
            }
            None => debug!("Telemetry beacon closed, record dropped"),
        }
    }
}

async fn run_worker(
    client: Client,
    endpoint: String,
    mut receiver: mpsc::UnboundedReceiver<TelemetryEvent>,
) {
    while let Some(event) = receiver.recv().await {
        send_beacon(&client, &endpoint, &event).await;
    }
}

async fn send_beacon(client: &Client, endpoint: &str, event: &TelemetryEvent) {
    let data = match serde_json::to_string(event) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to serialize telemetry record: {}", e);
            return;
        }
    };
    let cache_buster = chrono::Utc::now().timestamp_millis().to_string();

    let result = client
        .get(endpoint)
        .query(&[("data", data.as_str()), ("_", cache_buster.as_str())])
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            debug!(event = event.event.as_str(), "Telemetry beacon delivered");
        }
        Ok(response) => {
            warn!(
                event = event.event.as_str(),
                status = response.status().as_u16(),
                "Telemetry beacon rejected"
            );
        }
        Err(e) => {
            warn!(event = event.event.as_str(), "Telemetry beacon failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_beacon_sends_record_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/log"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let sink = BeaconSink::spawn(format!("{}/log", server.uri()));
        sink.emit(TelemetryEvent::new(EventKind::AppStart, "App initialized"));
        sink.emit(TelemetryEvent::new(EventKind::AnalyzeClick, "clicked").with_review("Nice"));
        sink.close().await;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);

        let pairs: Vec<(String, String)> = requests[1]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let data = &pairs.iter().find(|(k, _)| k == "data").unwrap().1;
        let record: serde_json::Value = serde_json::from_str(data).unwrap();
        assert_eq!(record["event"], "analyze_click");
        assert_eq!(record["review_preview"], "Nice");
        assert!(pairs.iter().any(|(k, _)| k == "_"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_swallowed() {
        let sink = BeaconSink::spawn("http://127.0.0.1:9/log");
        sink.emit(TelemetryEvent::new(EventKind::AppStart, "App initialized"));
        sink.close().await;

        // Emitting after close is a silent no-op
        sink.emit(TelemetryEvent::new(EventKind::AppStart, "late"));
    }
}
