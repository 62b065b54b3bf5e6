pub mod auth;
pub mod movimentacoes;
pub mod products;
pub mod users;
