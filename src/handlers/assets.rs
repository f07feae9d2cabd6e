// src/handlers/assets.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        analytics::PortfolioAnalytics,
        asset::{Asset, AssetChanges, AssetListQuery, DeleteAssetQuery, GetAssetQuery, SuccessResponse},
    },
    services::asset_service::DeleteMode,
};

// GET /api/assets
#[utoipa::path(
    get,
    path = "/api/assets",
    tag = "Assets",
    params(AssetListQuery),
    responses(
        (status = 200, description = "Ativos não excluídos, mais novos primeiro", body = Vec<Asset>),
        (status = 401, description = "Não autenticado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_assets(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<AssetListQuery>,
) -> Result<Json<Vec<Asset>>, AppError> {
    let assets = app_state.asset_service.list(&query.into()).await?;
    Ok(Json(assets))
}

// POST /api/assets
#[utoipa::path(
    post,
    path = "/api/assets",
    tag = "Assets",
    request_body = Asset,
    responses(
        (status = 201, description = "Ativo criado", body = Asset),
        (status = 400, description = "Nome/tipo ausentes ou campo inválido"),
        (status = 401, description = "Não autenticado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_asset(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let changes = AssetChanges::from_json(body)?;
    let asset = app_state.asset_service.create(&actor, changes).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

// GET /api/assets/{id}
#[utoipa::path(
    get,
    path = "/api/assets/{id}",
    tag = "Assets",
    params(
        ("id" = Uuid, Path, description = "ID do ativo"),
        GetAssetQuery
    ),
    responses(
        (status = 200, description = "Ativo", body = Asset),
        (status = 404, description = "Ativo não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_asset(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<GetAssetQuery>,
) -> Result<Json<Asset>, AppError> {
    // Só admin enxerga excluídos, e apenas quando pede
    let include_deleted = user.is_admin() && query.include_deleted.unwrap_or(false);
    let asset = app_state.asset_service.get(id, include_deleted).await?;
    Ok(Json(asset))
}

// PUT /api/assets/{id}
#[utoipa::path(
    put,
    path = "/api/assets/{id}",
    tag = "Assets",
    request_body = Asset,
    params(
        ("id" = Uuid, Path, description = "ID do ativo")
    ),
    responses(
        (status = 200, description = "Ativo atualizado", body = Asset),
        (status = 400, description = "Campo inválido"),
        (status = 404, description = "Ativo não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_asset(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<Asset>, AppError> {
    let changes = AssetChanges::from_json(body)?;
    let asset = app_state.asset_service.update(&actor, id, changes).await?;
    Ok(Json(asset))
}

// DELETE /api/assets/{id}?force=true
#[utoipa::path(
    delete,
    path = "/api/assets/{id}",
    tag = "Assets",
    params(
        ("id" = Uuid, Path, description = "ID do ativo"),
        DeleteAssetQuery
    ),
    responses(
        (status = 200, description = "Ativo removido", body = SuccessResponse),
        (status = 403, description = "Exclusão definitiva exige admin"),
        (status = 404, description = "Ativo não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_asset(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteAssetQuery>,
) -> Result<Json<SuccessResponse>, AppError> {
    let mode = if query.is_forced() {
        DeleteMode::Hard
    } else {
        DeleteMode::Soft
    };
    app_state.asset_service.delete(&actor, id, mode).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// GET /api/assets/analytics
#[utoipa::path(
    get,
    path = "/api/assets/analytics",
    tag = "Assets",
    responses(
        (status = 200, description = "Indicadores da carteira", body = PortfolioAnalytics),
        (status = 401, description = "Não autenticado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_analytics(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<PortfolioAnalytics>, AppError> {
    let analytics = app_state.asset_service.analytics().await?;
    Ok(Json(analytics))
}
