use mongodb::Database;
use mongodb::bson::doc;
use serde::Serialize;
use std::time::{Duration, Instant};

use super::MongoError;

/// Outcome of a liveness probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    /// Whether the server answered the ping
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    /// Round-trip time in milliseconds
    pub response_time_ms: u64,
}

impl HealthStatus {
    pub(super) fn from_probe(result: &Result<(), MongoError>, elapsed: Duration) -> Self {
        Self {
            healthy: result.is_ok(),
            message: result.as_ref().err().map(ToString::to_string),
            response_time_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Run `{ ping: 1 }` against `database`, bounded by `timeout`
pub async fn ping(database: &Database, timeout: Duration) -> Result<(), MongoError> {
    match tokio::time::timeout(timeout, database.run_command(doc! { "ping": 1 })).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(MongoError::Probe(e)),
        Err(_) => Err(MongoError::ProbeTimeout(timeout)),
    }
}

/// Check MongoDB health with a ping
pub async fn check_health(database: &Database, timeout: Duration) -> bool {
    ping(database, timeout).await.is_ok()
}

/// Check MongoDB health, returning timing and error details
///
/// # Example
/// ```ignore
/// let status = check_health_detailed(&db, Duration::from_secs(2)).await;
/// if !status.healthy {
///     tracing::warn!(message = ?status.message, "MongoDB unhealthy");
/// }
/// ```
pub async fn check_health_detailed(database: &Database, timeout: Duration) -> HealthStatus {
    let start = Instant::now();
    let result = ping(database, timeout).await;
    HealthStatus::from_probe(&result, start.elapsed())
}
