// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::signout,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::update_me,
        handlers::users::list_users,

        // --- Assets ---
        handlers::assets::list_assets,
        handlers::assets::create_asset,
        handlers::assets::get_asset,
        handlers::assets::update_asset,
        handlers::assets::delete_asset,
        handlers::assets::get_analytics,

        // --- Properties (vitrine pública) ---
        handlers::properties::list_properties,
        handlers::properties::get_property,

        // --- Audit ---
        handlers::audit::list_audit_logs,

        // --- Assistant ---
        handlers::chat::chat,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::LoginResponse,
            models::auth::RegisterResponse,
            models::auth::UserProfile,
            models::auth::UpdateProfilePayload,
            models::auth::MessageResponse,

            // --- Assets ---
            models::asset::Asset,
            models::asset::MediaItem,
            models::asset::SuccessResponse,

            // --- Analytics ---
            models::analytics::PortfolioAnalytics,
            models::analytics::SalesPipeline,
            models::analytics::LeaseMetrics,
            models::analytics::TopAssetEntry,

            // --- Audit ---
            models::audit::AuditAction,
            models::audit::AuditEntityType,
            models::audit::AuditLogEntry,

            // --- Assistant ---
            models::chat::ChatMessage,
            models::chat::ChatContext,
            models::chat::ChatRequest,
            models::chat::ChatReply,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Assets", description = "Gestão da Carteira de Imóveis"),
        (name = "Properties", description = "Listagem Pública de Imóveis"),
        (name = "Audit", description = "Trilha de Auditoria"),
        (name = "Assistant", description = "Assistente de IA da Carteira")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
