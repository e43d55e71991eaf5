use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "SPPD API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Perjalanan dinas: pengajuan, persetujuan, master data dan laporan",
            "endpoints": {
                "public": "/health, /v1/auth/login",
                "auth": "/v1/auth/profile, /v1/auth/password",
                "admin": "/v1/users, /v1/roles, /v1/menus, /v1/logs",
                "master": "/v1/master/:entity[/:id]",
                "bpd": "/v1/bpd[/:id]",
                "report": "/v1/report/:report[/export]",
            }
        }
    }))
}

/// GET /health - 200 when postgres answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": true,
                    "message": "Basis data tidak tersedia",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
