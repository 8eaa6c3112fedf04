use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::warn;

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "SongQueue server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "realtime": {
                "status": "healthy",
                "connections": state.hub().connection_count(),
            }
        }
    });

    let code = match state.db.ping().await {
        Ok(()) => {
            health_status["checks"]["database"] = json!({ "status": "healthy" });
            StatusCode::OK
        }
        Err(err) => {
            warn!(error = %err, "health check failed to reach database");
            health_status["checks"]["database"] = json!({ "status": "unhealthy" });
            health_status["status"] = json!("unhealthy");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (code, Json(health_status))
}
