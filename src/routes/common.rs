//! Liveness, readiness, and build info. Mounted at the root, outside `/api/v1`.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body shared by `/health` and `/ready`. `database` is only reported by readiness.
#[derive(Serialize, Debug, PartialEq, Eq)]
struct Probe {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
}

const BUILD: BuildInfo = BuildInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(Probe { status: "ok", database: None }) }))
        .route("/ready", get(ready))
        .route("/version", get(|| async { Json(BUILD) }))
        .with_state(state)
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Probe>) {
    let probe = match state.store.ping().await {
        Ok(()) => Probe {
            status: "ok",
            database: Some("ok"),
        },
        Err(e) => {
            tracing::warn!(error = %e, "store ping failed");
            Probe {
                status: "degraded",
                database: Some("unavailable"),
            }
        }
    };
    let status = if probe.database == Some("ok") {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(probe))
}
