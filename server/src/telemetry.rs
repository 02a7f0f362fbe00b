use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};

/// Delivery must never hold up a kiosk interaction; keep this short.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

const APP_NAME: &str = "check-in";

/// Best-effort usage-event forwarder.
///
/// Events are posted to the configured webhook from a detached task;
/// delivery failures are logged at debug and otherwise invisible to the
/// caller. Without a webhook URL the sink is a no-op.
#[derive(Debug, Clone)]
pub struct Telemetry {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl Telemetry {
    pub fn new(webhook_url: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self { http, webhook_url })
    }

    /// Queue a usage event. Fire-and-forget: returns immediately, and the
    /// caller learns nothing about delivery.
    pub fn track(&self, event_name: String, metadata: Map<String, Value>) {
        let Some(url) = self.webhook_url.clone() else {
            tracing::debug!(%event_name, "telemetry disabled, dropping event");
            return;
        };
        let http = self.http.clone();

        tokio::spawn(async move {
            let payload = build_payload(&event_name, metadata, Utc::now().to_rfc3339());
            if let Err(e) = http.post(&url).json(&payload).send().await {
                tracing::debug!(%event_name, "usage event delivery failed: {e}");
            }
        });
    }
}

/// App identity first, caller metadata over it, timestamp last so the
/// sink's clock always wins.
fn build_payload(event_name: &str, metadata: Map<String, Value>, timestamp: String) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "event_name".to_string(),
        Value::String(event_name.to_string()),
    );
    payload.insert("app_name".to_string(), Value::String(APP_NAME.to_string()));
    payload.insert(
        "app_version".to_string(),
        Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );
    for (key, value) in metadata {
        payload.insert(key, value);
    }
    payload.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(payload)
}
