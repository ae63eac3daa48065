use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::allow;
use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::{json_error_body, require_production_source, role_gate, RoleGate};
use crate::state::AppState;

pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected charts
        .merge(chart_routes(&state))
        .fallback(public::not_found)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.security))
                .layer(middleware::map_response(json_error_body))
                .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs))),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new().route("/login", post(auth::login))
}

fn chart_routes(state: &AppState) -> Router<AppState> {
    use protected::chart;

    let gate = |allowed| middleware::from_fn_with_state(RoleGate::new(state.keys.clone(), allowed), role_gate);

    Router::new()
        // Level 1: plant overview
        .route("/api/chart/manager", get(chart::manager_overview).route_layer(gate(allow::PLANT_OVERVIEW)))
        // Level 2: per machine within a process
        .route("/api/chart/process", get(chart::process_view).route_layer(gate(allow::PROCESS_VIEW)))
        // Level 3: one machine, hour by hour
        .route("/api/chart/machine", get(chart::machine_detail).route_layer(gate(allow::MACHINE_DETAIL)))
        .route("/api/chart/machines", get(chart::machine_list).route_layer(gate(allow::MACHINE_LIST)))
        // Added last so it wraps the role gates and runs first
        .route_layer(middleware::from_fn_with_state(state.clone(), require_production_source))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(12 * 60 * 60));

    // Browsers refuse credentials with a wildcard origin; bearer tokens do not need them
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins)).allow_credentials(true)
}
