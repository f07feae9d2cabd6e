// src/config.rs

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{AssetRepository, AuditRepository, UserRepository},
    services::{
        asset_service::AssetService,
        audit::AuditService,
        auth::AuthService,
        chat::{ChatService, LlmConfig},
        token::TokenService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub database_max_connections: u32,
    // Cookie `Secure` só em produção
    pub secure_cookies: bool,
    pub llm: LlmConfig,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = optional("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let database_max_connections = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .context("DATABASE_MAX_CONNECTIONS deve ser um número inteiro")?,
            None => 5,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            database_max_connections,
            secure_cookies: optional("APP_ENV").as_deref() == Some("production"),
            llm: LlmConfig {
                api_key: optional("GROQ_API_KEY"),
                base_url: optional("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.into()),
                model: optional("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.into()),
            },
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub token_service: TokenService,
    pub auth_service: AuthService,
    pub asset_service: AssetService,
    pub audit_service: AuditService,
    pub chat_service: ChatService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let settings = Settings::from_env()?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_parts(settings, db_pool)
    }

    /// Monta o grafo de dependências sobre um pool já criado.
    pub fn from_parts(settings: Settings, db_pool: PgPool) -> anyhow::Result<Self> {
        let token_service = TokenService::new(&settings.jwt_secret)?;

        let audit_service = AuditService::new(AuditRepository::new(db_pool.clone()));
        let auth_service = AuthService::new(
            UserRepository::new(db_pool.clone()),
            audit_service.clone(),
            token_service.clone(),
            db_pool.clone(),
        );
        let asset_service = AssetService::new(
            AssetRepository::new(db_pool.clone()),
            audit_service.clone(),
            db_pool.clone(),
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        let chat_service = ChatService::new(http, settings.llm.clone(), asset_service.clone());

        Ok(Self {
            db_pool,
            settings: Arc::new(settings),
            token_service,
            auth_service,
            asset_service,
            audit_service,
            chat_service,
        })
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.token_service.clone()
    }
}
