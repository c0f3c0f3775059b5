//! Router assembly.

mod api;
mod common;

pub use api::api_routes;
pub use common::common_routes;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::settings::Settings;
use crate::state::AppState;

/// Full application: common routes at the root, the API under `/api/v1`.
pub fn app(state: AppState, settings: &Settings) -> Router {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", api_routes(state))
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes));
    if settings.is_dev() {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
