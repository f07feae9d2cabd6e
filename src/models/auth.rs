// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papéis do sistema, em ordem decrescente de privilégio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")] // Banco
#[serde(rename_all = "snake_case")] // JSON
pub enum Role {
    Admin,        // "admin"
    AssetManager, // "asset_manager"
    Viewer,       // "viewer"
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::AssetManager => "asset_manager",
            Role::Viewer => "viewer",
        }
    }

    /// Papel pedido no registro. Qualquer valor fora da lista (ou ausente)
    /// vira `Viewer`, o papel de menor privilégio.
    pub fn from_requested(requested: Option<&str>) -> Role {
        match requested {
            Some("admin") => Role::Admin,
            Some("asset_manager") => Role::AssetManager,
            _ => Role::Viewer,
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário.
// Só exigimos e-mail e senha preenchidos; o formato do e-mail não é validado.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required."))]
    #[schema(example = "a@x.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    #[schema(example = "secret1")]
    pub password: String,

    #[schema(example = "viewer")]
    pub role: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: Uuid,
    pub role: Role,
}

// Perfil exposto em /api/user/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// Nome e senha em branco são ignorados; o e-mail é obrigatório.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,

    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// Estrutura de dados ("claims") dentro do JWT de sessão
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub role: Role,
    pub email: String,
    pub iat: i64, // Issued At
    pub exp: i64, // Expiration time
}
