// src/db/product_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{Product, ProdutoRow},
};

const PRODUTO_COLS: &str = "id, nome, descricao, preco, sku, quantidade, categoria";

/// Contrato de persistência do agregado Produto. O service só conhece este
/// trait; a implementação concreta é injetada na montagem do AppState.
#[async_trait]
pub trait ProductRepo: Send + Sync {
    /// Persiste um produto transiente e devolve a instância já com ID.
    async fn create(&self, product: &Product) -> Result<Product, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError>;

    /// Busca por nome com correspondência parcial, sem diferenciar maiúsculas.
    /// Devolve o primeiro resultado.
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, AppError>;

    /// Lista produtos; com termo de busca, filtra por nome, SKU ou descrição.
    async fn find_all(&self, search_term: Option<&str>) -> Result<Vec<Product>, AppError>;

    /// Sobrescreve a linha inteira com o estado atual da entidade.
    /// Devolve None se nenhuma linha casou com o id.
    async fn update(&self, id: Uuid, product: &Product) -> Result<Option<Product>, AppError>;

    /// true se alguma linha foi removida.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

// O repositório de produtos, responsável por todas as interações com a
// tabela 'produtos'.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepo for PgProductRepository {
    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProdutoRow>(
            "INSERT INTO produtos (nome, descricao, preco, sku, quantidade, categoria) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, nome, descricao, preco, sku, quantidade, categoria",
        )
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(product.sku())
        .bind(product.quantity())
        .bind(product.category())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte a violação da UNIQUE em sku num erro de domínio.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            e.into()
        })?;

        Product::from_existing(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProdutoRow>(&format!(
            "SELECT {PRODUTO_COLS} FROM produtos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::from_existing).transpose()
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProdutoRow>(&format!(
            "SELECT {PRODUTO_COLS} FROM produtos WHERE sku = $1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::from_existing).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProdutoRow>(&format!(
            "SELECT {PRODUTO_COLS} FROM produtos WHERE nome ILIKE $1 LIMIT 1"
        ))
        .bind(format!("%{name}%"))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::from_existing).transpose()
    }

    async fn find_all(&self, search_term: Option<&str>) -> Result<Vec<Product>, AppError> {
        let rows = match search_term {
            Some(term) => {
                sqlx::query_as::<_, ProdutoRow>(&format!(
                    "SELECT {PRODUTO_COLS} FROM produtos \
                     WHERE nome ILIKE $1 OR sku ILIKE $1 OR descricao ILIKE $1"
                ))
                .bind(format!("%{term}%"))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProdutoRow>(&format!("SELECT {PRODUTO_COLS} FROM produtos"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        // Linha que não reconstrói a entidade é pulada com log, em vez de
        // derrubar a listagem inteira: resultado parcial vale mais que
        // falha total aqui.
        let products = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match Product::from_existing(row) {
                    Ok(product) => Some(product),
                    Err(e) => {
                        tracing::warn!("Produto {} ignorado na listagem: {}", id, e);
                        None
                    }
                }
            })
            .collect();

        Ok(products)
    }

    async fn update(&self, id: Uuid, product: &Product) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProdutoRow>(
            "UPDATE produtos \
             SET nome = $1, descricao = $2, preco = $3, sku = $4, quantidade = $5, categoria = $6 \
             WHERE id = $7 \
             RETURNING id, nome, descricao, preco, sku, quantidade, categoria",
        )
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(product.sku())
        .bind(product.quantity())
        .bind(product.category())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            e.into()
        })?;

        row.map(Product::from_existing).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
