pub mod auth;
pub mod movimentacao_service;
pub mod product_service;
pub mod user_service;
