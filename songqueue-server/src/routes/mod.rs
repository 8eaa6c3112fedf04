pub mod v1;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use songqueue_core::api::routes::system;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handlers::{health_handler, ping_handler},
    infra::{app_state::AppState, config::Config},
};

/// Create the main API router with all versions
pub fn create_api_router() -> Router<AppState> {
    Router::new().merge(v1::create_v1_router())
}

/// Full application: API, system probes, static UI, CORS and tracing.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(state.config());

    let mut app = Router::new()
        .route(system::PING, get(ping_handler))
        .route(system::HEALTH, get(health_handler))
        .merge(create_api_router());

    if let Some(root) = state.config().static_files.root.clone() {
        let index = root.join("index.html");
        app = app.fallback_service(
            ServeDir::new(root).fallback(ServeFile::new(index)),
        );
    }

    app.layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let allow_origin = if config.cors.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods);

    if config.cors.allows_any_origin() {
        layer.allow_headers(Any)
    } else {
        layer.allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    }
}
