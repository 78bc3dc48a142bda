//! Liveness payload for whatever HTTP surface embeds the engine.

use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
}

/// Current liveness snapshot.
pub fn health_status() -> HealthStatus {
    HealthStatus {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    }
}

impl HealthStatus {
    /// JSON body for a health endpoint response.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"status":"ok"}"#))
    }
}
