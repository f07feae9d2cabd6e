// src/middleware/gate.rs

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::{middleware::auth::Identity, models::auth::Role, services::token::TokenService};

pub const TOKEN_COOKIE: &str = "token";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

const PUBLIC_PATHS: &[&str] = &["/", "/login", "/unauthorized", "/favicon.ico"];
const PUBLIC_PREFIXES: &[&str] = &["/api/auth/", "/static/", "/_next/", "/public/"];
const PROTECTED_PREFIXES: &[&str] = &["/admin", "/api/assets"];
const ADMIN_PREFIXES: &[&str] = &["/admin/users", "/api/users", "/api/audit-logs"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Unguarded,
    Protected,
    AdminOnly,
}

/// Classifica o caminho da requisição. Caminhos de administração são,
/// implicitamente, protegidos.
pub fn classify(path: &str) -> RouteClass {
    if PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::Public;
    }
    if ADMIN_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::AdminOnly;
    }
    if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::Protected;
    }
    RouteClass::Unguarded
}

/// Cookie `token` primeiro; depois `Authorization: Bearer`.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_owned());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

fn is_api(path: &str) -> bool {
    path.starts_with("/api/")
}

fn unauthenticated(path: &str) -> Response {
    if is_api(path) {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
    } else {
        Redirect::to("/login").into_response()
    }
}

fn forbidden(path: &str) -> Response {
    if is_api(path) {
        (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" }))).into_response()
    } else {
        Redirect::to("/unauthorized").into_response()
    }
}

// Cabeçalhos de identidade vindos do cliente nunca passam adiante
fn stamp_identity(headers: &mut HeaderMap, identity: &Identity) {
    headers.remove(USER_ID_HEADER);
    headers.remove(USER_ROLE_HEADER);

    if let Ok(value) = HeaderValue::from_str(&identity.user_id.to_string()) {
        headers.insert(USER_ID_HEADER, value);
    }
    headers.insert(USER_ROLE_HEADER, HeaderValue::from_static(identity.role.as_str()));
}

/// Middleware de controle de acesso aplicado a todas as rotas.
pub async fn access_gate(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    let class = classify(&path);
    if matches!(class, RouteClass::Public | RouteClass::Unguarded) {
        return next.run(request).await;
    }

    let Some(token) = extract_token(request.headers()) else {
        return unauthenticated(&path);
    };

    let Some(claims) = tokens.verify(&token) else {
        return unauthenticated(&path);
    };

    if class == RouteClass::AdminOnly && claims.role != Role::Admin {
        tracing::warn!("⛔ {} ({}) barrado em {}", claims.user_id, claims.role.as_str(), path);
        return forbidden(&path);
    }

    let identity = Identity::from(claims);
    stamp_identity(request.headers_mut(), &identity);
    request.extensions_mut().insert(identity);

    next.run(request).await
}
