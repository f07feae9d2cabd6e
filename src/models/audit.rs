// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Login => "LOGIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEntityType {
    Asset,
    User,
}

impl AuditEntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntityType::Asset => "ASSET",
            AuditEntityType::User => "USER",
        }
    }
}

// Linha da trilha de auditoria. Gravada uma vez, nunca alterada.
// `action` e `entity_type` ficam como texto no banco.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[schema(example = "DELETE")]
    pub action: String,
    #[schema(example = "ASSET")]
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    pub entity_type: Option<AuditEntityType>,
    pub entity_id: Option<Uuid>,
    /// Padrão 100, máximo 500
    pub limit: Option<i64>,
}

impl AuditLogQuery {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 500;

    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_stored_names() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Login,
        ] {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, action.as_str());
        }
        assert_eq!(serde_json::to_value(AuditEntityType::Asset).unwrap(), "ASSET");
    }

    #[test]
    fn limit_is_clamped() {
        let q = AuditLogQuery::default();
        assert_eq!(q.effective_limit(), 100);

        let q = AuditLogQuery { limit: Some(10_000), ..Default::default() };
        assert_eq!(q.effective_limit(), 500);

        let q = AuditLogQuery { limit: Some(0), ..Default::default() };
        assert_eq!(q.effective_limit(), 1);
    }
}
