use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::gate::extract_token,
    models::auth::{Role, SessionClaims},
    services::token::TokenService,
};

/// Identidade verificada do chamador, anexada à requisição pelo gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
    pub email: String,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
            email: claims.email,
        }
    }
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// Extrator para obter o usuário autenticado diretamente nos handlers.
// Em rotas fora dos prefixos protegidos o gate não deixa a extensão,
// então o próprio extrator verifica o token.
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthenticatedUser(identity.clone()));
        }

        let tokens = TokenService::from_ref(state);
        extract_token(&parts.headers)
            .and_then(|token| tokens.verify(&token))
            .map(|claims| AuthenticatedUser(claims.into()))
            .ok_or(AppError::Unauthorized)
    }
}
