// src/db/movimentacao_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        movimentacao::{Movimentacao, TipoMovimentacao, UpdateMovimentacaoPayload},
        product::ProdutoRow,
    },
};

const MOVIMENTACAO_COLS: &str =
    "id, produto_id, usuario_id, tipo, quantidade_movimentada, data_movimentacao, observacoes";

// O repositório do livro-razão de movimentações. As funções de escrita da
// criação aceitam um executor genérico para rodarem dentro da transação que
// o service abre (ajuste de saldo + lançamento têm que ser atômicos).
#[derive(Clone)]
pub struct MovimentacaoRepository {
    pool: PgPool,
}

impl MovimentacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções transacionais (recebem executor)
    // ---

    /// Carrega a linha do produto com FOR UPDATE, travando-a até o commit.
    /// Duas movimentações concorrentes do mesmo produto se serializam aqui.
    pub async fn get_produto_for_update<'e, E>(
        &self,
        executor: E,
        produto_id: Uuid,
    ) -> Result<Option<ProdutoRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ProdutoRow>(
            "SELECT id, nome, descricao, preco, sku, quantidade, categoria \
             FROM produtos WHERE id = $1 FOR UPDATE",
        )
        .bind(produto_id)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    /// Grava o novo saldo calculado pela entidade.
    pub async fn set_produto_quantidade<'e, E>(
        &self,
        executor: E,
        produto_id: Uuid,
        quantidade: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE produtos SET quantidade = $1 WHERE id = $2")
            .bind(quantidade)
            .bind(produto_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Registra o lançamento no livro-razão. O timestamp vem do banco.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        produto_id: Uuid,
        usuario_id: Uuid,
        tipo: TipoMovimentacao,
        quantidade_movimentada: i32,
        observacoes: Option<&str>,
    ) -> Result<Movimentacao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimentacao = sqlx::query_as::<_, Movimentacao>(
            "INSERT INTO movimentacoes \
                 (produto_id, usuario_id, tipo, quantidade_movimentada, observacoes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, produto_id, usuario_id, tipo, quantidade_movimentada, \
                       data_movimentacao, observacoes",
        )
        .bind(produto_id)
        .bind(usuario_id)
        .bind(tipo)
        .bind(quantidade_movimentada)
        .bind(observacoes)
        .fetch_one(executor)
        .await?;

        Ok(movimentacao)
    }

    // ---
    // Funções de leitura e manutenção (usam a pool)
    // ---

    pub async fn list(&self) -> Result<Vec<Movimentacao>, AppError> {
        let movimentacoes = sqlx::query_as::<_, Movimentacao>(&format!(
            "SELECT {MOVIMENTACAO_COLS} FROM movimentacoes ORDER BY data_movimentacao DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(movimentacoes)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Movimentacao>, AppError> {
        let movimentacao = sqlx::query_as::<_, Movimentacao>(&format!(
            "SELECT {MOVIMENTACAO_COLS} FROM movimentacoes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movimentacao)
    }

    /// Atualização parcial: monta dinamicamente a lista de campos presentes.
    /// Devolve true se alguma linha casou com o id.
    pub async fn update_fields(
        &self,
        id: Uuid,
        payload: &UpdateMovimentacaoPayload,
    ) -> Result<bool, AppError> {
        if payload.is_empty() {
            return Ok(false);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE movimentacoes SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(produto_id) = payload.produto_id {
                sets.push("produto_id = ");
                sets.push_bind_unseparated(produto_id);
            }
            if let Some(usuario_id) = payload.usuario_id {
                sets.push("usuario_id = ");
                sets.push_bind_unseparated(usuario_id);
            }
            if let Some(tipo) = payload.tipo {
                sets.push("tipo = ");
                sets.push_bind_unseparated(tipo);
            }
            if let Some(quantidade) = payload.quantidade_movimentada {
                sets.push("quantidade_movimentada = ");
                sets.push_bind_unseparated(quantidade);
            }
            if let Some(ref observacoes) = payload.observacoes {
                sets.push("observacoes = ");
                sets.push_bind_unseparated(observacoes.clone());
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM movimentacoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
