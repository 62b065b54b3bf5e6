// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, RegisterUserPayload, User},
};

/// Regra de força de senha: mínimo 8 caracteres com maiúscula, minúscula,
/// número e um caractere especial de `!@#$%&*_`.
pub fn validate_password(pw: &str) -> bool {
    pw.len() >= 8
        && pw.chars().any(|c| c.is_ascii_digit())
        && pw.chars().any(|c| c.is_ascii_uppercase())
        && pw.chars().any(|c| c.is_ascii_lowercase())
        && pw.chars().any(|c| "!@#$%&*_".contains(c))
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<String, AppError> {
        if !validate_password(&payload.password) {
            return Err(AppError::WeakPassword);
        }

        // Hashing fora do event loop: bcrypt é caro de propósito.
        let password = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // A UNIQUE em ra/email vira RaOrEmailAlreadyExists no repositório.
        let new_user = self
            .user_repo
            .create_user(
                &payload.ra,
                &payload.nome,
                &payload.email,
                &hashed_password,
                payload.is_admin,
            )
            .await?;

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, ra: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_ra(ra)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senha_forte_passa() {
        assert!(validate_password("Abc123!x"));
        assert!(validate_password("Senha_Forte9"));
    }

    #[test]
    fn senha_fraca_reprova() {
        assert!(!validate_password("curta1!"));      // menos de 8
        assert!(!validate_password("semnumero!A"));  // sem dígito
        assert!(!validate_password("SEMMINUSCULA1!"));
        assert!(!validate_password("semmaiuscula1!"));
        assert!(!validate_password("SemEspecial123"));
    }
}
