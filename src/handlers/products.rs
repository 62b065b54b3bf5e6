// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequireAdmin,
    models::product::{CreateProductPayload, ProductDto, UpdateProductPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Filtra por nome, SKU ou descrição (sem diferenciar maiúsculas).
    pub search: Option<String>,
}

// ---
// Handler: create_product
// ---
#[utoipa::path(
    post,
    path = "/api/produtos",
    tag = "Produtos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = ProductDto),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "SKU já em uso"),
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Json(payload): Json<CreateProductPayload>,
) -> Result<Response, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    match app_state.product_service.create(payload).await? {
        Some(product) => Ok((StatusCode::CREATED, Json(product)).into_response()),
        // O service devolve None quando o SKU já existe: conflito, não erro.
        None => Ok((
            StatusCode::CONFLICT,
            Json(json!({ "error": "Já existe produto associado a este SKU!" })),
        )
            .into_response()),
    }
}

// ---
// Handler: get_all_products
// ---
#[utoipa::path(
    get,
    path = "/api/produtos",
    tag = "Produtos",
    params(ListProductsQuery),
    responses((status = 200, description = "Lista de produtos", body = [ProductDto])),
    security(("api_jwt" = []))
)]
pub async fn get_all_products(
    State(app_state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Response, AppError> {
    let products = app_state
        .product_service
        .find_all(query.search.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(products)).into_response())
}

// ---
// Handler: get_product_by_id
// ---
#[utoipa::path(
    get,
    path = "/api/produtos/id/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto encontrado", body = ProductDto),
        (status = 404, description = "Produto não encontrado"),
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product_by_id(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match app_state.product_service.find_by_id(id).await? {
        Some(product) => Ok((StatusCode::OK, Json(product)).into_response()),
        None => Ok(not_found()),
    }
}

// ---
// Handler: get_product_by_name
// ---
#[utoipa::path(
    get,
    path = "/api/produtos/name/{name}",
    tag = "Produtos",
    params(("name" = String, Path, description = "Nome (ou parte do nome) do produto")),
    responses(
        (status = 200, description = "Produto encontrado", body = ProductDto),
        (status = 404, description = "Produto não encontrado"),
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product_by_name(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    match app_state.product_service.find_by_name(&name).await? {
        Some(product) => Ok((StatusCode::OK, Json(product)).into_response()),
        None => Ok(not_found()),
    }
}

// ---
// Handler: update_product
// ---
#[utoipa::path(
    put,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = ProductDto),
        (status = 400, description = "Dados inválidos ou corpo vazio"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "SKU já utilizado por outro produto"),
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Response, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Pelo menos um campo deve ser fornecido para atualização.
    if payload.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Nenhum campo fornecido para atualização!" })),
        )
            .into_response());
    }

    match app_state.product_service.update_fields(id, payload).await? {
        Some(product) => Ok((StatusCode::OK, Json(product)).into_response()),
        None => Ok(not_found()),
    }
}

// ---
// Handler: delete_product
// ---
#[utoipa::path(
    delete,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado"),
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if app_state.product_service.delete(id).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Produto excluído com sucesso!" })),
        )
            .into_response())
    } else {
        Ok(not_found())
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Produto não encontrado." })),
    )
        .into_response()
}
