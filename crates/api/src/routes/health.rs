use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Readiness of the server's two collaborators: the database and the
/// upload directory that kit images are streamed into.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every check passes, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The upload directory exists and is writable.
    pub upload_dir_ready: bool,
}

impl HealthResponse {
    fn new(db_healthy: bool, upload_dir_ready: bool) -> Self {
        let status = if db_healthy && upload_dir_ready {
            "ok"
        } else {
            "degraded"
        };
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            upload_dir_ready,
        }
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (db, upload_dir_ready) = tokio::join!(
        kitstore_db::health_check(&state.pool),
        state.images.is_ready()
    );

    if let Err(e) = &db {
        tracing::warn!(error = %e, "Database health check failed");
    }
    if !upload_dir_ready {
        tracing::warn!(dir = %state.images.dir().display(), "Upload directory is not ready");
    }

    Json(HealthResponse::new(db.is_ok(), upload_dir_ready))
}

/// Mount health check routes (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
