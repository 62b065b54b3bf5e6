pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::{PgProductRepository, ProductRepo};
pub mod movimentacao_repo;
pub use movimentacao_repo::MovimentacaoRepository;
