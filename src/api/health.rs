//! Container probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;
use crate::infrastructure::services::CategoryService;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct Health {
    /// `healthy` or `unhealthy`
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageHealth>,
}

#[derive(Debug, Serialize)]
pub struct StorageHealth {
    pub reachable: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Process is up and serving
pub async fn health_check() -> impl IntoResponse {
    Json(Health {
        status: "healthy",
        version: VERSION,
        storage: None,
    })
}

/// 503 when the store cannot be queried
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage = probe_storage(&state.categories).await;

    let (status_code, status) = if storage.reachable {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let body = Health {
        status,
        version: VERSION,
        storage: Some(storage),
    };

    (status_code, Json(body))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Round-trip through the smallest table
async fn probe_storage(categories: &CategoryService) -> StorageHealth {
    let start = Instant::now();
    let result = categories.list().await;

    StorageHealth {
        reachable: result.is_ok(),
        latency_ms: start.elapsed().as_millis() as u64,
        error: result.err().map(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::storage::mock::MockStorage;
    use crate::domain::Category;

    #[tokio::test]
    async fn test_unreachable_storage_is_reported() {
        let storage = MockStorage::<Category>::new().with_error("connection refused");
        let categories = CategoryService::new(Arc::new(storage));

        let probe = probe_storage(&categories).await;

        assert!(!probe.reachable);
        assert!(probe.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_liveness_body_omits_storage() {
        let body = Health {
            status: "healthy",
            version: "1.0.0",
            storage: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"status": "healthy", "version": "1.0.0"}));
    }
}
