// src/db/user_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Cria um novo usuário no banco de dados
    pub async fn create_user(
        &self,
        ra: &str,
        nome: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (ra, nome, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(ra)
        .bind(nome)
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::RaOrEmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Busca um usuário pelo seu RA
    pub async fn find_by_ra(&self, ra: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE ra = $1")
            .bind(ra)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY nome ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Atualização parcial por RA; só os campos presentes entram no SET.
    /// O hash da senha já chega pronto (o service cuida do bcrypt).
    pub async fn update_fields(
        &self,
        ra: &str,
        nome: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        if nome.is_none() && email.is_none() && password_hash.is_none() {
            return self.find_by_ra(ra).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(nome) = nome {
                sets.push("nome = ");
                sets.push_bind_unseparated(nome.to_owned());
            }
            if let Some(email) = email {
                sets.push("email = ");
                sets.push_bind_unseparated(email.to_owned());
            }
            if let Some(hash) = password_hash {
                sets.push("password_hash = ");
                sets.push_bind_unseparated(hash.to_owned());
            }
            sets.push("updated_at = now()");
        }
        qb.push(" WHERE ra = ");
        qb.push_bind(ra.to_owned());
        qb.push(" RETURNING *");

        qb.build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::RaOrEmailAlreadyExists;
                    }
                }
                e.into()
            })
    }

    pub async fn delete_by_ra(&self, ra: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE ra = $1")
            .bind(ra)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
