// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Produtos ---
        handlers::products::create_product,
        handlers::products::get_all_products,
        handlers::products::get_product_by_id,
        handlers::products::get_product_by_name,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Movimentações ---
        handlers::movimentacoes::create_movimentacao,
        handlers::movimentacoes::list_movimentacoes,
        handlers::movimentacoes::get_movimentacao_by_id,
        handlers::movimentacoes::update_movimentacao,
        handlers::movimentacoes::delete_movimentacao,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::UpdateUserPayload,

            // --- Produtos ---
            models::product::ProductDto,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,

            // --- Movimentações ---
            models::movimentacao::TipoMovimentacao,
            models::movimentacao::Movimentacao,
            models::movimentacao::CreateMovimentacaoPayload,
            models::movimentacao::UpdateMovimentacaoPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Gestão de Usuários"),
        (name = "Produtos", description = "Catálogo e Estoque de Produtos"),
        (name = "Movimentações", description = "Livro-razão de Entradas e Saídas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
