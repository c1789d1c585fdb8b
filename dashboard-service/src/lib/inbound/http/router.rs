use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::create_admin::create_admin;
use super::handlers::create_device::create_device;
use super::handlers::delete_device::delete_device;
use super::handlers::list_devices::list_devices;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::reset_device_password::reset_device_password;
use super::handlers::update_rate::update_rate;
use super::middleware::authenticate as auth_middleware;
use crate::domain::principal::service::AuthService;
use crate::domain::settings::service::SettingsService;
use crate::outbound::repositories::PostgresAdminRepository;
use crate::outbound::repositories::PostgresDeviceRepository;
use crate::outbound::repositories::PostgresSettingsRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<PostgresAdminRepository, PostgresDeviceRepository>>,
    pub settings_service: Arc<SettingsService<PostgresSettingsRepository>>,
}

pub fn create_router(
    auth_service: Arc<AuthService<PostgresAdminRepository, PostgresDeviceRepository>>,
    settings_service: Arc<SettingsService<PostgresSettingsRepository>>,
) -> Router {
    let state = AppState {
        auth_service,
        settings_service,
    };

    // create-admin is unauthenticated; the service rejects it once any
    // admin account exists
    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/admin/create-admin", post(create_admin));

    let protected_routes = Router::new()
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/me", get(me))
        .route("/api/admin/devices", post(create_device))
        .route("/api/admin/devices", get(list_devices))
        .route("/api/admin/devices/:device_id", delete(delete_device))
        .route(
            "/api/admin/devices/:device_id/reset-password",
            put(reset_device_password),
        )
        .route("/api/settings/rate", put(update_rate))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
