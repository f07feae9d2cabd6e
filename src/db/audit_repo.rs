// src/db/audit_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::audit::{AuditAction, AuditEntityType, AuditLogEntry, AuditLogQuery},
};

// Trilha de auditoria: só INSERT e SELECT. Não existe UPDATE nem DELETE aqui.
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        action: AuditAction,
        entity_type: AuditEntityType,
        entity_id: Option<Uuid>,
        details: Option<Value>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (user_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(action.as_str())
        .bind(entity_type.as_str())
        .bind(entity_id)
        .bind(details)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Entradas mais recentes primeiro
    pub async fn list(&self, query: &AuditLogQuery) -> Result<Vec<AuditLogEntry>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, user_id, action, entity_type, entity_id, details, created_at FROM audit_logs WHERE TRUE",
        );
        if let Some(entity_type) = query.entity_type {
            qb.push(" AND entity_type = ").push_bind(entity_type.as_str());
        }
        if let Some(entity_id) = query.entity_id {
            qb.push(" AND entity_id = ").push_bind(entity_id);
        }
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(query.effective_limit());

        let entries = qb
            .build_query_as::<AuditLogEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}
