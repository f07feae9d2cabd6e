// src/services/password.rs

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::common::error::AppError;

// O bcrypt é caro de propósito: roda fora das threads do runtime.
pub async fn hash_password(plaintext: &str) -> Result<String, AppError> {
    let password_clone = plaintext.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

// Comparação feita pela rotina de verificação do próprio bcrypt.
// Hash malformado no banco é erro interno, não "senha errada".
pub async fn compare_password(plaintext: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = plaintext.to_owned();
    let password_hash_clone = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_compare() {
        let hashed = hash_password("secret1").await.unwrap();
        assert_ne!(hashed, "secret1");
        assert!(compare_password("secret1", &hashed).await.unwrap());
        assert!(!compare_password("secret2", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let a = hash_password("secret1").await.unwrap();
        let b = hash_password("secret1").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let result = compare_password("secret1", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(AppError::BcryptError(_))));
    }
}
