// src/handlers/properties.rs
// Vitrine pública: sem autenticação, apenas leitura.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::asset::{Asset, AssetFilter},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PropertyListQuery {
    /// Quantidade máxima de imóveis
    pub limit: Option<i64>,
}

// GET /api/properties
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    params(PropertyListQuery),
    responses(
        (status = 200, description = "Imóveis publicados, mais novos primeiro", body = Vec<Asset>)
    )
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
    Query(query): Query<PropertyListQuery>,
) -> Result<Json<Vec<Asset>>, AppError> {
    let filter = AssetFilter {
        limit: query.limit.filter(|l| *l > 0),
        ..Default::default()
    };
    Ok(Json(app_state.asset_service.list(&filter).await?))
}

// GET /api/properties/{id}
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(
        ("id" = Uuid, Path, description = "ID do imóvel")
    ),
    responses(
        (status = 200, description = "Imóvel", body = Asset),
        (status = 404, description = "Imóvel não encontrado")
    )
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Asset>, AppError> {
    Ok(Json(app_state.asset_service.get(id, false).await?))
}
