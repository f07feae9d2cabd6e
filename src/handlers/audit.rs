// src/handlers/audit.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::audit::{AuditLogEntry, AuditLogQuery},
};

// GET /api/audit-logs
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    tag = "Audit",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Entradas mais recentes primeiro", body = Vec<AuditLogEntry>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Somente administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<Vec<AuditLogEntry>>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Forbidden"));
    }

    let entries = app_state.audit_service.recent(&query).await?;
    Ok(Json(entries))
}
