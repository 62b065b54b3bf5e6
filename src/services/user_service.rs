// src/services/user_service.rs

use bcrypt::hash;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{UpdateUserPayload, User},
    services::auth::validate_password,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }

    /// Atualização parcial por RA. Senha nova passa pela regra de força e é
    /// re-hasheada antes de chegar ao repositório.
    pub async fn update_fields(
        &self,
        ra: &str,
        payload: UpdateUserPayload,
    ) -> Result<Option<User>, AppError> {
        let hashed_password = match payload.password {
            Some(password) => {
                if !validate_password(&password) {
                    return Err(AppError::WeakPassword);
                }
                let hashed =
                    tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                        .await
                        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
                Some(hashed)
            }
            None => None,
        };

        self.user_repo
            .update_fields(
                ra,
                payload.nome.as_deref(),
                payload.email.as_deref(),
                hashed_password.as_deref(),
            )
            .await
    }

    pub async fn delete(&self, ra: &str) -> Result<bool, AppError> {
        self.user_repo.delete_by_ra(ra).await
    }
}
