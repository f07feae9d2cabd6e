// src/handlers/users.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{MessageResponse, UpdateProfilePayload, UserProfile},
};

// GET /api/user/me
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = UserProfile),
        (status = 401, description = "Não autenticado"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = app_state.auth_service.current_user(identity.user_id).await?;
    Ok(Json(user.into()))
}

// PUT /api/user/me
#[utoipa::path(
    put,
    path = "/api/user/me",
    tag = "Users",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = MessageResponse),
        (status = 400, description = "E-mail ausente"),
        (status = 401, description = "Não autenticado"),
        (status = 409, description = "E-mail em uso por outra conta")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .update_profile(
            identity.user_id,
            &payload.email,
            payload.name.as_deref(),
            payload.password.as_deref(),
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Profile updated successfully".to_string(),
    }))
}

// GET /api/users (somente admin)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<UserProfile>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Somente administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Forbidden"));
    }

    let users = app_state.auth_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
