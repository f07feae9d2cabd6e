use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campos obrigatórios ausentes: {0}")]
    MissingFields(&'static str),

    #[error("Usuário já existe")]
    UserAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Não autenticado")]
    Unauthorized,

    #[error("Acesso negado: {0}")]
    Forbidden(&'static str),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Assistente de IA não configurado")]
    AssistantUnavailable,

    #[error("Falha no assistente de IA: {0}")]
    AssistantFailed(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::MissingFields(message) => (StatusCode::BAD_REQUEST, message),
            AppError::UserAlreadyExists => (StatusCode::BAD_REQUEST, "User already exists"),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "This email is already in use.")
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::AssistantUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI assistant is not configured",
            ),
            AppError::AssistantFailed(ref reason) => {
                tracing::error!("🔥 Falha no assistente de IA: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request")
            }

            // Todo o resto (banco, bcrypt, JWT, anyhow) vira 500.
            // O `tracing` registra a mensagem detalhada; o cliente recebe uma genérica.
            ref e => {
                tracing::error!("🔥 Erro Interno do Servidor: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Converte violação de e-mail único (constraint `users_email_key`) no erro dado.
pub(crate) fn map_unique_email(e: sqlx::Error, on_conflict: AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return on_conflict;
        }
    }
    e.into()
}
