pub mod auth;
pub mod movimentacao;
pub mod product;
