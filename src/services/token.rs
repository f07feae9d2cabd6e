// src/services/token.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, SessionClaims},
};

/// Validade fixa do token de sessão.
pub const SESSION_TTL_HOURS: i64 = 24;

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Emite e verifica tokens de sessão HS256 assinados com um segredo compartilhado.
///
/// Não há estado no servidor: um token só deixa de valer ao expirar.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    validation: Arc<Validation>,
}

impl TokenService {
    /// O segredo precisa vir da configuração. Não existe valor padrão.
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        if secret.trim().is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            validation: Arc::new(validation),
        })
    }

    pub fn sign(&self, user_id: Uuid, role: Role, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            user_id,
            role,
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &SessionClaims) -> Result<String, AppError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.keys.encoding,
        )?)
    }

    /// `Some` apenas com assinatura válida e token dentro da validade.
    /// Qualquer falha (malformado, adulterado, expirado) vira `None`.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionClaims>(token, &self.keys.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Verificação de JWT falhou: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-with-enough-entropy").unwrap()
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(TokenService::new("").is_err());
        assert!(TokenService::new("   ").is_err());
    }

    #[test]
    fn fresh_token_verifies() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let token = tokens.sign(user_id, Role::AssetManager, "a@x.com").unwrap();

        let claims = tokens.verify(&token).expect("token should verify");
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.role, Role::AssetManager);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_HOURS * 3600);
    }

    #[test]
    fn header_declares_hs256() {
        let tokens = service();
        let token = tokens.sign(Uuid::new_v4(), Role::Viewer, "a@x.com").unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let now = Utc::now();
        let claims = SessionClaims {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            email: "a@x.com".into(),
            iat: (now - Duration::hours(25)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = tokens.encode_claims(&claims).unwrap();
        assert!(tokens.verify(&token).is_none());
    }

    #[test]
    fn altered_signature_is_rejected() {
        let tokens = service();
        let token = tokens.sign(Uuid::new_v4(), Role::Admin, "a@x.com").unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = signature.as_bytes().to_vec();
        bytes[0] = if bytes[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{head}.{}", String::from_utf8(bytes).unwrap());

        assert!(tokens.verify(&tampered).is_none());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = TokenService::new("a-different-secret").unwrap();
        let token = other.sign(Uuid::new_v4(), Role::Admin, "a@x.com").unwrap();
        assert!(service().verify(&token).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = service();
        assert!(tokens.verify("").is_none());
        assert!(tokens.verify("not.a.jwt").is_none());
    }
}
