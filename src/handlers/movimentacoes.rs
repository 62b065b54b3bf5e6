// src/handlers/movimentacoes.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::movimentacao::{CreateMovimentacaoPayload, Movimentacao, UpdateMovimentacaoPayload},
};

// ---
// Handler: create_movimentacao
// ---
#[utoipa::path(
    post,
    path = "/api/movimentacoes",
    tag = "Movimentações",
    request_body = CreateMovimentacaoPayload,
    responses(
        (status = 201, description = "Movimentação registrada", body = Movimentacao),
        (status = 400, description = "Dados inválidos ou estoque insuficiente"),
        (status = 404, description = "Produto não encontrado"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_movimentacao(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateMovimentacaoPayload>,
) -> Result<Response, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Quem movimentou vem do token, nunca do corpo.
    match app_state
        .movimentacao_service
        .create(user.id, payload)
        .await?
    {
        Some(movimentacao) => Ok((StatusCode::CREATED, Json(movimentacao)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Produto não encontrado para movimentação." })),
        )
            .into_response()),
    }
}

// ---
// Handler: list_movimentacoes
// ---
#[utoipa::path(
    get,
    path = "/api/movimentacoes",
    tag = "Movimentações",
    responses((status = 200, description = "Movimentações, mais recentes primeiro", body = [Movimentacao])),
    security(("api_jwt" = []))
)]
pub async fn list_movimentacoes(
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let movimentacoes = app_state.movimentacao_service.list().await?;
    Ok((StatusCode::OK, Json(movimentacoes)).into_response())
}

// ---
// Handler: get_movimentacao_by_id
// ---
#[utoipa::path(
    get,
    path = "/api/movimentacoes/{id}",
    tag = "Movimentações",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses(
        (status = 200, description = "Movimentação encontrada", body = Movimentacao),
        (status = 404, description = "Movimentação não encontrada"),
    ),
    security(("api_jwt" = []))
)]
pub async fn get_movimentacao_by_id(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match app_state.movimentacao_service.get_by_id(id).await? {
        Some(movimentacao) => Ok((StatusCode::OK, Json(movimentacao)).into_response()),
        None => Ok(not_found()),
    }
}

// ---
// Handler: update_movimentacao
// ---
#[utoipa::path(
    put,
    path = "/api/movimentacoes/{id}",
    tag = "Movimentações",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    request_body = UpdateMovimentacaoPayload,
    responses(
        (status = 200, description = "Movimentação corrigida"),
        (status = 400, description = "Dados inválidos ou corpo vazio"),
        (status = 404, description = "Movimentação não encontrada"),
    ),
    security(("api_jwt" = []))
)]
pub async fn update_movimentacao(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovimentacaoPayload>,
) -> Result<Response, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if payload.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Nenhum campo fornecido para atualização!" })),
        )
            .into_response());
    }

    if app_state
        .movimentacao_service
        .update_fields(id, &payload)
        .await?
    {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Movimentação atualizada com sucesso!" })),
        )
            .into_response())
    } else {
        Ok(not_found())
    }
}

// ---
// Handler: delete_movimentacao
// ---
#[utoipa::path(
    delete,
    path = "/api/movimentacoes/{id}",
    tag = "Movimentações",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses(
        (status = 200, description = "Movimentação excluída"),
        (status = 404, description = "Movimentação não encontrada"),
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_movimentacao(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if app_state.movimentacao_service.delete(id).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Movimentação excluída com sucesso!" })),
        )
            .into_response())
    } else {
        Ok(not_found())
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Movimentação não encontrada." })),
    )
        .into_response()
}
