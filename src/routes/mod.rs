//! Router assembly: API resources, common probes, and the HTTP middleware stack.

mod api;
mod common;

pub use api::{api_routes, API_PREFIX};
pub use common::common_routes;

use crate::settings::HttpSettings;
use crate::state::AppState;
use axum::http::HeaderValue;
use axum::Router;
use tower::Layer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

fn cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full application. Trailing slashes are trimmed before routing, so `/api/v1/users/`
/// and `/api/v1/users` hit the same handler.
pub fn app(state: AppState, http: &HttpSettings) -> NormalizePath<Router> {
    let api = api_routes(state.clone())
        .layer(RequestBodyLimitLayer::new(http.body_limit))
        .layer(cors(&http.cors_origins));
    let router = Router::new()
        .merge(common_routes(state))
        .merge(api)
        .layer(TraceLayer::new_for_http());
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
