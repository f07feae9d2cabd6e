// src/services/auth.rs

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        audit::{AuditAction, AuditEntityType},
        auth::{Role, User},
    },
    services::{
        audit::AuditService,
        password::{compare_password, hash_password},
        token::TokenService,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    audit: AuditService,
    tokens: TokenService,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        audit: AuditService,
        tokens: TokenService,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, audit, tokens, pool }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        requested_role: Option<&str>,
    ) -> Result<User, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::MissingFields("Email and password required"));
        }

        let role = Role::from_requested(requested_role);

        // 1. E-mail já cadastrado? Comparação exata.
        if self.user_repo.find_by_email(&self.pool, email).await?.is_some() {
            return Err(AppError::UserAlreadyExists);
        }

        // 2. Hashing (fora da transação, não toca no banco)
        let hashed_password = hash_password(password).await?;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 3. Cria o usuário. A constraint única cobre a corrida entre 1 e 3.
        let new_user = self
            .user_repo
            .create_user(&mut *tx, email, &hashed_password, role)
            .await?;

        // 4. Auto-registro: o próprio usuário aparece como autor
        self.audit
            .log_action(
                &mut *tx,
                new_user.id,
                AuditAction::Create,
                AuditEntityType::User,
                Some(new_user.id),
                Some(json!({ "role": role })),
            )
            .await;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("👤 Usuário {} registrado como {}", new_user.id, role.as_str());
        Ok(new_user)
    }

    /// Valida as credenciais e devolve o usuário com um token de sessão novo.
    pub async fn login_user(
        &self,
        email: &str,
        password: &str,
        client_ip: &str,
    ) -> Result<(User, String), AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::MissingFields("Email and password required"));
        }

        let user = self
            .user_repo
            .find_by_email(&self.pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !compare_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.sign(user.id, user.role, &user.email)?;

        self.audit
            .log_detached(
                &self.pool,
                user.id,
                AuditAction::Login,
                AuditEntityType::User,
                Some(user.id),
                Some(json!({ "ip": client_ip })),
            )
            .await;

        Ok((user, token))
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Atualiza nome, e-mail e senha do próprio usuário.
    /// Nome e senha em branco são ignorados.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        email: &str,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, AppError> {
        if email.is_empty() {
            return Err(AppError::MissingFields("Email is required"));
        }

        let name = name.filter(|n| !n.trim().is_empty());
        let password_hash = match password.filter(|p| !p.trim().is_empty()) {
            Some(p) => Some(hash_password(p).await?),
            None => None,
        };

        let mut changes = vec!["email"];
        if name.is_some() {
            changes.push("name");
        }
        if password_hash.is_some() {
            changes.push("password");
        }

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .update_profile(&mut *tx, user_id, email, name, password_hash.as_deref())
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.audit
            .log_action(
                &mut *tx,
                user_id,
                AuditAction::Update,
                AuditEntityType::User,
                Some(user_id),
                Some(json!({ "changes": changes })),
            )
            .await;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }
}
