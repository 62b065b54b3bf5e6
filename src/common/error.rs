use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// "Não encontrado" não vive aqui: services devolvem Option/bool e o handler
// decide o 404.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Invariante da entidade Produto violada (preço negativo, nome vazio...)
    #[error("{0}")]
    ProdutoInvalido(String),

    #[error("A quantia solicitada para remoção de estoque é maior que a quantia em estoque!")]
    EstoqueInsuficiente,

    #[error("SKU já existe")]
    SkuAlreadyExists,

    #[error("RA ou e-mail já existe")]
    RaOrEmailAlreadyExists,

    #[error("Senha fraca")]
    WeakPassword,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito a administradores")]
    AdminOnly,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Acessar o id de um produto ainda não persistido é erro de programação,
    // não erro do cliente.
    #[error("O produto \"{0}\" ainda não possui um ID.")]
    ProdutoSemId(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ProdutoInvalido(ref msg) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
            }
            AppError::EstoqueInsuficiente => (
                StatusCode::BAD_REQUEST,
                "A quantia solicitada para remoção de estoque é maior que a quantia em estoque!",
            ),
            AppError::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "A senha deve ter ao menos 8 caracteres, maiúscula, minúscula, número e caractere especial.",
            ),
            AppError::SkuAlreadyExists => {
                (StatusCode::CONFLICT, "Já existe produto associado a este SKU!")
            }
            AppError::RaOrEmailAlreadyExists => (StatusCode::CONFLICT, "O RA/Email está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "RA ou senha inválidos."),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::AdminOnly => (
                StatusCode::FORBIDDEN,
                "Apenas administradores podem realizar esta ação.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),

            // Todos os outros erros (DatabaseError, ProdutoSemId, InternalServerError)
            // viram 500. O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
