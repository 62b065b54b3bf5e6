// src/models/movimentacao.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Tipo da movimentação: entrada (estoque sobe) ou saída (estoque desce).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "tipo_movimentacao", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum TipoMovimentacao {
    Entrada,
    Saida,
}

/// Registro imutável do livro-razão de estoque: quem movimentou o quê,
/// quanto e quando. O carimbo de data vem do banco.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movimentacao {
    pub id: Uuid,
    pub produto_id: Uuid,
    pub usuario_id: Uuid,
    pub tipo: TipoMovimentacao,
    pub quantidade_movimentada: i32,
    pub data_movimentacao: DateTime<Utc>,
    pub observacoes: Option<String>,
}

// ---
// Payload: CreateMovimentacao
// ---
// O usuário que movimentou vem do token, não do corpo da requisição: um
// registro de auditoria só vale alguma coisa se o autor vier da sessão.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovimentacaoPayload {
    pub produto_id: Uuid,

    pub tipo: TipoMovimentacao,

    #[validate(range(min = 1, message = "A quantidade movimentada deve ser maior que zero."))]
    pub quantidade_movimentada: i32,

    pub observacoes: Option<String>,
}

// ---
// Payload: UpdateMovimentacao (parcial)
// ---
// Correção de lançamento no livro-razão. Só os campos presentes mudam;
// o saldo do produto não é recalculado aqui.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovimentacaoPayload {
    pub produto_id: Option<Uuid>,

    pub usuario_id: Option<Uuid>,

    pub tipo: Option<TipoMovimentacao>,

    #[validate(range(min = 1, message = "A quantidade movimentada deve ser maior que zero."))]
    pub quantidade_movimentada: Option<i32>,

    pub observacoes: Option<String>,
}

impl UpdateMovimentacaoPayload {
    pub fn is_empty(&self) -> bool {
        self.produto_id.is_none()
            && self.usuario_id.is_none()
            && self.tipo.is_none()
            && self.quantidade_movimentada.is_none()
            && self.observacoes.is_none()
    }
}
