// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{MovimentacaoRepository, PgProductRepository, UserRepository},
    services::{
        auth::AuthService, movimentacao_service::MovimentacaoService,
        product_service::ProductService, user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub product_service: ProductService,
    pub movimentacao_service: MovimentacaoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        // Repositórios sempre injetados via construtor; nada de singleton
        // de conexão em módulo.
        let user_repo = UserRepository::new(db_pool.clone());
        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let user_service = UserService::new(user_repo);

        let product_service =
            ProductService::new(Arc::new(PgProductRepository::new(db_pool.clone())));

        let movimentacao_service = MovimentacaoService::new(
            MovimentacaoRepository::new(db_pool.clone()),
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            user_service,
            product_service,
            movimentacao_service,
        })
    }
}
