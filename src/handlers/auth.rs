// src/handlers/auth.rs

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::gate::TOKEN_COOKIE,
    models::auth::{LoginResponse, LoginUserPayload, RegisterResponse, RegisterUserPayload},
    services::token::SESSION_TTL_HOURS,
};

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::hours(SESSION_TTL_HOURS))
        .build()
}

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 200, description = "Usuário registrado", body = RegisterResponse),
        (status = 400, description = "Campos ausentes ou usuário já existe")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<Json<RegisterResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .auth_service
        .register_user(&payload.email, &payload.password, payload.role.as_deref())
        .await?;

    Ok(Json(RegisterResponse {
        success: true,
        user_id: user.id,
        role: user.role,
    }))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado; cookie `token` definido", body = LoginResponse),
        (status = 400, description = "Campos ausentes"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (user, token) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password, &client_ip(&headers))
        .await?;

    let jar = jar.add(session_cookie(token, app_state.settings.secure_cookies));

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            role: user.role,
        }),
    ))
}

// GET|POST /api/auth/signout
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "Auth",
    responses(
        (status = 303, description = "Cookie removido; redireciona para /login")
    )
)]
pub async fn signout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, Redirect::to("/login"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_falls_back_to_unknown() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), "unknown");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc".into(), true);
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }
}
