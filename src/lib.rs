// src/lib.rs

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::get,
    routing::post,
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc, middleware::gate::access_gate};

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// Monta o router completo. O gate envolve todas as rotas, inclusive o
/// fallback, para que páginas protegidas redirecionem mesmo sem handler.
pub fn app(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/signout",
            get(handlers::auth::signout).post(handlers::auth::signout),
        );

    let asset_routes = Router::new()
        .route(
            "/",
            get(handlers::assets::list_assets).post(handlers::assets::create_asset),
        )
        .route("/analytics", get(handlers::assets::get_analytics))
        .route(
            "/{id}",
            get(handlers::assets::get_asset)
                .put(handlers::assets::update_asset)
                .delete(handlers::assets::delete_asset),
        );

    let property_routes = Router::new()
        .route("/", get(handlers::properties::list_properties))
        .route("/{id}", get(handlers::properties::get_property));

    let api = Router::new()
        .route("/api/health", get(handlers::health::health))
        .route(
            "/api/user/me",
            get(handlers::users::get_me).put(handlers::users::update_me),
        )
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/audit-logs", get(handlers::audit::list_audit_logs))
        .route("/api/chat", post(handlers::chat::chat))
        .nest("/api/auth", auth_routes)
        .nest("/api/assets", asset_routes)
        .nest("/api/properties", property_routes)
        .fallback(not_found)
        .with_state(app_state.clone());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(axum_middleware::from_fn_with_state(
            app_state.token_service.clone(),
            access_gate,
        ))
        .layer(TraceLayer::new_for_http())
}
