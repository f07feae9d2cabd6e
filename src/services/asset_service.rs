// src/services/asset_service.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AssetRepository,
    middleware::auth::Identity,
    models::{
        analytics::PortfolioAnalytics,
        asset::{Asset, AssetChanges, AssetFilter},
        audit::{AuditAction, AuditEntityType},
        auth::Role,
    },
    services::{analytics, audit::AuditService},
};

const ASSET_NOT_FOUND: &str = "Asset not found";

/// Como um ativo deve ser removido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    Soft,
    Hard,
}

impl DeleteMode {
    fn audit_label(self) -> &'static str {
        match self {
            DeleteMode::Soft => "SOFT_DELETE",
            DeleteMode::Hard => "HARD_DELETE",
        }
    }
}

#[derive(Clone)]
pub struct AssetService {
    asset_repo: AssetRepository,
    audit: AuditService,
    pool: PgPool,
}

impl AssetService {
    pub fn new(asset_repo: AssetRepository, audit: AuditService, pool: PgPool) -> Self {
        Self { asset_repo, audit, pool }
    }

    pub async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>, AppError> {
        self.asset_repo.list(filter).await
    }

    pub async fn analytics(&self) -> Result<PortfolioAnalytics, AppError> {
        let assets = self.asset_repo.list(&AssetFilter::default()).await?;
        analytics::summarize(&assets)
    }

    /// Ativos excluídos logicamente só aparecem para quem pode auditá-los.
    pub async fn get(&self, id: Uuid, include_deleted: bool) -> Result<Asset, AppError> {
        match self.asset_repo.find_by_id(id).await? {
            Some(asset) if !asset.is_deleted || include_deleted => Ok(asset),
            _ => Err(AppError::NotFound(ASSET_NOT_FOUND)),
        }
    }

    pub async fn create(&self, actor: &Identity, changes: AssetChanges) -> Result<Asset, AppError> {
        changes.require_for_create()?;

        let mut tx = self.pool.begin().await?;

        let asset = self.asset_repo.insert(&mut *tx, &changes).await?;

        self.audit
            .log_action(
                &mut *tx,
                actor.user_id,
                AuditAction::Create,
                AuditEntityType::Asset,
                Some(asset.id),
                Some(json!({ "name": asset.name })),
            )
            .await;

        tx.commit().await?;
        tracing::info!("🏠 Ativo {} criado por {}", asset.id, actor.user_id);
        Ok(asset)
    }

    pub async fn update(
        &self,
        actor: &Identity,
        id: Uuid,
        changes: AssetChanges,
    ) -> Result<Asset, AppError> {
        let mut tx = self.pool.begin().await?;

        let asset = self
            .asset_repo
            .update(&mut *tx, id, &changes)
            .await?
            .ok_or(AppError::NotFound("Asset not found or no changes made"))?;

        // Só os nomes dos campos, nunca os valores
        self.audit
            .log_action(
                &mut *tx,
                actor.user_id,
                AuditAction::Update,
                AuditEntityType::Asset,
                Some(id),
                Some(json!({ "changes": changes.changed_fields() })),
            )
            .await;

        tx.commit().await?;
        Ok(asset)
    }

    /// Exclusão lógica por padrão; a definitiva é exclusiva de administradores
    /// e é recusada antes de qualquer acesso ao banco.
    pub async fn delete(&self, actor: &Identity, id: Uuid, mode: DeleteMode) -> Result<(), AppError> {
        if mode == DeleteMode::Hard && actor.role != Role::Admin {
            return Err(AppError::Forbidden("Forbidden: Admins only"));
        }

        let mut tx = self.pool.begin().await?;

        let removed = match mode {
            DeleteMode::Soft => self.asset_repo.soft_delete(&mut *tx, id).await?,
            DeleteMode::Hard => self.asset_repo.hard_delete(&mut *tx, id).await?,
        };
        if !removed {
            return Err(AppError::NotFound(ASSET_NOT_FOUND));
        }

        self.audit
            .log_action(
                &mut *tx,
                actor.user_id,
                AuditAction::Delete,
                AuditEntityType::Asset,
                Some(id),
                Some(json!({ "type": mode.audit_label() })),
            )
            .await;

        tx.commit().await?;
        tracing::info!("🗑️ Ativo {} removido ({}) por {}", id, mode.audit_label(), actor.user_id);
        Ok(())
    }
}
