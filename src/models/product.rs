// src/models/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

/// A entidade Produto. Encapsula os dados e as regras de negócio de um único
/// produto: preço e quantidade nunca negativos, nome e SKU nunca vazios.
///
/// Toda mutação passa por um método nomeado que valida a própria invariante
/// antes de alterar o campo; assim nenhum caminho (criação, atualização
/// parcial, movimentação de estoque) consegue gravar um produto inválido.
/// A unicidade *global* do SKU não é checada aqui: a entidade não enxerga os
/// outros registros, isso é papel do service e da constraint no banco.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: Option<Uuid>,
    name: String,
    description: Option<String>,
    price: Decimal,
    sku: String,
    quantity: i32,
    category: Option<String>,
}

impl Product {
    fn validate_fields(
        name: &str,
        price: Decimal,
        sku: &str,
        quantity: i32,
    ) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::ProdutoInvalido(
                "O nome do produto não pode ser vazio.".into(),
            ));
        }
        if sku.trim().is_empty() {
            return Err(AppError::ProdutoInvalido(
                "O SKU do produto não pode ser vazio.".into(),
            ));
        }
        if price < Decimal::ZERO {
            return Err(AppError::ProdutoInvalido(
                "O preço do produto não pode ser negativo.".into(),
            ));
        }
        if quantity < 0 {
            return Err(AppError::ProdutoInvalido(
                "A quantidade do produto não pode ser negativa.".into(),
            ));
        }
        Ok(())
    }

    /// Cria um produto "transiente": ainda sem ID, antes de ir ao banco.
    pub fn create(
        name: String,
        price: Decimal,
        sku: String,
        quantity: i32,
        description: Option<String>,
        category: Option<String>,
    ) -> Result<Self, AppError> {
        Self::validate_fields(&name, price, &sku, quantity)?;
        Ok(Self {
            id: None,
            name,
            description,
            price,
            sku,
            quantity,
            category,
        })
    }

    /// Reconstitui um produto persistido a partir de uma linha do banco.
    /// Checagem defensiva: o banco sempre deveria fornecer um ID.
    pub fn from_existing(row: ProdutoRow) -> Result<Self, AppError> {
        Self::validate_fields(&row.nome, row.preco, &row.sku, row.quantidade)?;
        Ok(Self {
            id: Some(row.id),
            name: row.nome,
            description: row.descricao,
            price: row.preco,
            sku: row.sku,
            quantity: row.quantidade,
            category: row.categoria,
        })
    }

    /// ID do produto persistido. Num produto transiente isso é erro de
    /// programação (o ID só existe depois do `create` do repositório).
    pub fn id(&self) -> Result<Uuid, AppError> {
        self.id.ok_or_else(|| AppError::ProdutoSemId(self.name.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn update_name(&mut self, new_name: String) -> Result<(), AppError> {
        if new_name.trim().is_empty() {
            return Err(AppError::ProdutoInvalido(
                "O nome do produto não pode ser vazio.".into(),
            ));
        }
        self.name = new_name;
        Ok(())
    }

    pub fn update_price(&mut self, new_price: Decimal) -> Result<(), AppError> {
        if new_price < Decimal::ZERO {
            return Err(AppError::ProdutoInvalido(
                "O preço do produto não pode ser negativo.".into(),
            ));
        }
        self.price = new_price;
        Ok(())
    }

    pub fn update_sku(&mut self, new_sku: String) -> Result<(), AppError> {
        if new_sku.trim().is_empty() {
            return Err(AppError::ProdutoInvalido(
                "O SKU do produto não pode ser vazio.".into(),
            ));
        }
        self.sku = new_sku;
        Ok(())
    }

    pub fn update_description(&mut self, new_description: Option<String>) {
        self.description = new_description;
    }

    pub fn update_category(&mut self, new_category: Option<String>) {
        self.category = new_category;
    }

    /// Aumenta o estoque. A quantidade deve ser positiva.
    pub fn increase_stock(&mut self, amount: i32) -> Result<(), AppError> {
        if amount <= 0 {
            return Err(AppError::ProdutoInvalido(
                "A quantidade para adicionar ao estoque deve ser maior que zero.".into(),
            ));
        }
        self.quantity += amount;
        Ok(())
    }

    /// Diminui o estoque. Falha sem alterar nada se a quantidade pedida for
    /// maior que o saldo atual.
    pub fn decrease_stock(&mut self, amount: i32) -> Result<(), AppError> {
        if amount <= 0 {
            return Err(AppError::ProdutoInvalido(
                "A quantidade para remover do estoque deve ser maior que zero.".into(),
            ));
        }
        if amount > self.quantity {
            return Err(AppError::EstoqueInsuficiente);
        }
        self.quantity -= amount;
        Ok(())
    }
}

/// Linha da tabela `produtos`, como sai do banco.
#[derive(Debug, Clone, FromRow)]
pub struct ProdutoRow {
    pub id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: Decimal,
    pub sku: String,
    pub quantidade: i32,
    pub categoria: Option<String>,
}

/// Representação de saída de um produto (resposta da API).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sku: String,
    pub quantity: i32,
    pub category: Option<String>,
}

impl ProductDto {
    /// Mapeia a entidade para a representação de saída. Só faz sentido para
    /// produtos persistidos, por isso propaga o erro do acessor `id()`.
    pub fn from_entity(product: &Product) -> Result<Self, AppError> {
        Ok(Self {
            id: product.id()?,
            name: product.name().to_owned(),
            description: product.description().map(str::to_owned),
            price: product.price(),
            sku: product.sku().to_owned(),
            quantity: product.quantity(),
            category: product.category().map(str::to_owned),
        })
    }
}

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    pub category: Option<String>,
}

// ---
// Payload: UpdateProduct (parcial)
// ---
// Cada campo presente mapeia um-para-um num mutador da entidade; campo
// ausente não é tocado. Nada de despacho por nome de campo em string.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,

    #[validate(length(min = 1, message = "O SKU não pode ser vazio."))]
    pub sku: Option<String>,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: Option<i32>,

    pub category: Option<String>,
}

impl UpdateProductPayload {
    /// Nenhum campo presente: nada a atualizar.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.sku.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caneta() -> Product {
        Product::create(
            "Caneta".into(),
            Decimal::new(25, 1),
            "CN-01".into(),
            100,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn create_valida_invariantes() {
        assert!(Product::create("Caneta".into(), Decimal::ZERO, "CN-01".into(), 0, None, None).is_ok());

        let preco_negativo =
            Product::create("Caneta".into(), Decimal::new(-1, 0), "CN-01".into(), 10, None, None);
        assert!(matches!(preco_negativo, Err(AppError::ProdutoInvalido(_))));

        let quantidade_negativa =
            Product::create("Caneta".into(), Decimal::ONE, "CN-01".into(), -1, None, None);
        assert!(matches!(quantidade_negativa, Err(AppError::ProdutoInvalido(_))));

        let nome_vazio = Product::create("   ".into(), Decimal::ONE, "CN-01".into(), 10, None, None);
        assert!(matches!(nome_vazio, Err(AppError::ProdutoInvalido(_))));

        let sku_vazio = Product::create("Caneta".into(), Decimal::ONE, "".into(), 10, None, None);
        assert!(matches!(sku_vazio, Err(AppError::ProdutoInvalido(_))));
    }

    #[test]
    fn id_de_produto_transiente_e_erro_de_estado() {
        let produto = caneta();
        assert!(matches!(produto.id(), Err(AppError::ProdutoSemId(_))));
    }

    #[test]
    fn from_existing_carrega_o_id() {
        let row = ProdutoRow {
            id: Uuid::new_v4(),
            nome: "Caneta".into(),
            descricao: Some("Azul".into()),
            preco: Decimal::new(25, 1),
            sku: "CN-01".into(),
            quantidade: 100,
            categoria: None,
        };
        let esperado = row.id;
        let produto = Product::from_existing(row).unwrap();
        assert_eq!(produto.id().unwrap(), esperado);
    }

    #[test]
    fn decrease_nunca_deixa_estoque_negativo() {
        let mut produto = caneta();
        let resultado = produto.decrease_stock(2000);
        assert!(matches!(resultado, Err(AppError::EstoqueInsuficiente)));
        // O saldo não pode ter sido alterado pela tentativa que falhou.
        assert_eq!(produto.quantity(), 100);
    }

    #[test]
    fn increase_depois_decrease_volta_ao_saldo_original() {
        let mut produto = caneta();
        produto.increase_stock(37).unwrap();
        produto.decrease_stock(37).unwrap();
        assert_eq!(produto.quantity(), 100);
    }

    #[test]
    fn quantidade_de_movimento_deve_ser_positiva() {
        let mut produto = caneta();
        assert!(produto.increase_stock(0).is_err());
        assert!(produto.increase_stock(-5).is_err());
        assert!(produto.decrease_stock(0).is_err());
        assert_eq!(produto.quantity(), 100);
    }

    #[test]
    fn mutadores_validam_antes_de_alterar() {
        let mut produto = caneta();
        assert!(produto.update_name("".into()).is_err());
        assert_eq!(produto.name(), "Caneta");

        assert!(produto.update_price(Decimal::new(-10, 0)).is_err());
        assert_eq!(produto.price(), Decimal::new(25, 1));

        assert!(produto.update_sku("  ".into()).is_err());
        assert_eq!(produto.sku(), "CN-01");

        produto.update_name("Caneta Azul".into()).unwrap();
        produto.update_category(Some("Papelaria".into()));
        assert_eq!(produto.name(), "Caneta Azul");
        assert_eq!(produto.category(), Some("Papelaria"));
    }
}
