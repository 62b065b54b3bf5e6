// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequireAdmin,
    models::auth::{UpdateUserPayload, User},
};

// ---
// Handler: list_users (somente admin)
// ---
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Lista de usuários", body = [User]),
        (status = 403, description = "Apenas administradores"),
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
) -> Result<Response, AppError> {
    let users = app_state.user_service.list().await?;
    Ok((StatusCode::OK, Json(users)).into_response())
}

// ---
// Handler: update_user (por RA, somente admin)
// ---
#[utoipa::path(
    put,
    path = "/api/users/{ra}",
    tag = "Users",
    params(("ra" = String, Path, description = "RA do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 400, description = "Dados inválidos ou corpo vazio"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "E-mail já em uso"),
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(ra): Path<String>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Response, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if payload.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Nenhum campo fornecido para atualização!" })),
        )
            .into_response());
    }

    match app_state.user_service.update_fields(&ra, payload).await? {
        Some(user) => Ok((StatusCode::OK, Json(user)).into_response()),
        None => Err(AppError::UserNotFound),
    }
}

// ---
// Handler: delete_user (por RA, somente admin)
// ---
#[utoipa::path(
    delete,
    path = "/api/users/{ra}",
    tag = "Users",
    params(("ra" = String, Path, description = "RA do usuário")),
    responses(
        (status = 200, description = "Usuário excluído"),
        (status = 404, description = "Usuário não encontrado"),
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(ra): Path<String>,
) -> Result<Response, AppError> {
    if app_state.user_service.delete(&ra).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Usuário excluído com sucesso!" })),
        )
            .into_response())
    } else {
        Err(AppError::UserNotFound)
    }
}
