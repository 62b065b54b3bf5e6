// src/services/movimentacao_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MovimentacaoRepository,
    models::{
        movimentacao::{CreateMovimentacaoPayload, Movimentacao, TipoMovimentacao,
                       UpdateMovimentacaoPayload},
        product::Product,
    },
};

#[derive(Clone)]
pub struct MovimentacaoService {
    movimentacao_repo: MovimentacaoRepository,
    pool: PgPool,
}

impl MovimentacaoService {
    pub fn new(movimentacao_repo: MovimentacaoRepository, pool: PgPool) -> Self {
        Self {
            movimentacao_repo,
            pool,
        }
    }

    /// Registra a movimentação e ajusta o saldo do produto na MESMA
    /// transação: ou o lançamento e o novo saldo entram juntos, ou nada
    /// entra. Uma saída maior que o estoque falha na entidade antes de
    /// qualquer escrita.
    ///
    /// Devolve `Ok(None)` quando o produto referenciado não existe.
    pub async fn create(
        &self,
        usuario_id: Uuid,
        payload: CreateMovimentacaoPayload,
    ) -> Result<Option<Movimentacao>, AppError> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE serializa movimentações concorrentes do mesmo produto.
        let Some(row) = self
            .movimentacao_repo
            .get_produto_for_update(&mut *tx, payload.produto_id)
            .await?
        else {
            // tx sofre rollback automático ao sair do escopo (drop).
            return Ok(None);
        };

        let mut produto = Product::from_existing(row)?;
        match payload.tipo {
            TipoMovimentacao::Entrada => produto.increase_stock(payload.quantidade_movimentada)?,
            TipoMovimentacao::Saida => produto.decrease_stock(payload.quantidade_movimentada)?,
        }

        self.movimentacao_repo
            .set_produto_quantidade(&mut *tx, produto.id()?, produto.quantity())
            .await?;

        let movimentacao = self
            .movimentacao_repo
            .insert(
                &mut *tx,
                produto.id()?,
                usuario_id,
                payload.tipo,
                payload.quantidade_movimentada,
                payload.observacoes.as_deref(),
            )
            .await?;

        tx.commit().await?;
        Ok(Some(movimentacao))
    }

    pub async fn list(&self) -> Result<Vec<Movimentacao>, AppError> {
        self.movimentacao_repo.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Movimentacao>, AppError> {
        self.movimentacao_repo.get_by_id(id).await
    }

    /// Correção de lançamento: altera só os campos presentes e NÃO recalcula
    /// o saldo do produto.
    pub async fn update_fields(
        &self,
        id: Uuid,
        payload: &UpdateMovimentacaoPayload,
    ) -> Result<bool, AppError> {
        self.movimentacao_repo.update_fields(id, payload).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.movimentacao_repo.delete(id).await
    }
}
