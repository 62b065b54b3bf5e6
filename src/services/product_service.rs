// src/services/product_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepo,
    models::product::{CreateProductPayload, Product, ProductDto, UpdateProductPayload},
};

/// Regras de negócio que a entidade e o repositório não conseguem garantir
/// sozinhos: a checagem prévia de SKU entre registros e a semântica da
/// atualização parcial. O repositório é injetado no construtor; não existe
/// conexão ambiente/global neste projeto.
#[derive(Clone)]
pub struct ProductService {
    product_repo: Arc<dyn ProductRepo>,
}

impl ProductService {
    pub fn new(product_repo: Arc<dyn ProductRepo>) -> Self {
        Self { product_repo }
    }

    /// Cria um produto. SKU já existente devolve `Ok(None)` em vez de erro,
    /// para o handler distinguir conflito (409) de validação (400).
    ///
    /// A checagem prévia é só um atalho de mensagem: quem garante a
    /// unicidade de verdade é a constraint UNIQUE do banco, e a violação
    /// dela vira `SkuAlreadyExists` no repositório.
    pub async fn create(
        &self,
        payload: CreateProductPayload,
    ) -> Result<Option<ProductDto>, AppError> {
        if self.product_repo.find_by_sku(&payload.sku).await?.is_some() {
            tracing::warn!("Tentativa de criar produto com SKU duplicado: {}", payload.sku);
            return Ok(None);
        }

        let product = Product::create(
            payload.name,
            payload.price,
            payload.sku,
            payload.quantity,
            payload.description,
            payload.category,
        )?;

        let created = self.product_repo.create(&product).await?;
        Ok(Some(ProductDto::from_entity(&created)?))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductDto>, AppError> {
        match self.product_repo.find_by_id(id).await? {
            Some(product) => Ok(Some(ProductDto::from_entity(&product)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<ProductDto>, AppError> {
        match self.product_repo.find_by_name(name).await? {
            Some(product) => Ok(Some(ProductDto::from_entity(&product)?)),
            None => Ok(None),
        }
    }

    pub async fn find_all(&self, search_term: Option<&str>) -> Result<Vec<ProductDto>, AppError> {
        self.product_repo
            .find_all(search_term)
            .await?
            .iter()
            .map(ProductDto::from_entity)
            .collect()
    }

    /// Atualização parcial: cada campo presente passa pelo mutador
    /// correspondente da entidade. Corpo vazio é no-op e devolve o produto
    /// como está.
    pub async fn update_fields(
        &self,
        id: Uuid,
        payload: UpdateProductPayload,
    ) -> Result<Option<ProductDto>, AppError> {
        let Some(mut product) = self.product_repo.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = payload.name {
            product.update_name(name)?;
        }
        if let Some(price) = payload.price {
            product.update_price(price)?;
        }
        if let Some(sku) = payload.sku {
            // SKU novo não pode pertencer a *outro* produto. Reafirmar o
            // próprio SKU atual passa trivialmente.
            if product.sku() != sku {
                if let Some(other) = self.product_repo.find_by_sku(&sku).await? {
                    if other.id()? != product.id()? {
                        return Err(AppError::SkuAlreadyExists);
                    }
                }
            }
            product.update_sku(sku)?;
        }
        if let Some(new_quantity) = payload.quantity {
            // Quantidade nunca é atribuída direto: vira um delta que passa
            // por increase/decrease, para a invariante de estoque valer em
            // toda mudança e não só na criação.
            let current = product.quantity();
            if new_quantity > current {
                product.increase_stock(new_quantity - current)?;
            } else if new_quantity < current {
                product.decrease_stock(current - new_quantity)?;
            }
        }
        if let Some(category) = payload.category {
            product.update_category(Some(category));
        }
        if let Some(description) = payload.description {
            product.update_description(Some(description));
        }

        match self.product_repo.update(id, &product).await? {
            Some(updated) => Ok(Some(ProductDto::from_entity(&updated)?)),
            // Corrida: a linha sumiu entre o load e o update.
            None => Err(AppError::InternalServerError(anyhow::anyhow!(
                "Falha inesperada ao atualizar o produto no repositório."
            ))),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.product_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ProdutoRow;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Repositório em memória para exercitar as regras do service sem banco.
    #[derive(Default)]
    struct InMemoryProductRepo {
        rows: Mutex<HashMap<Uuid, ProdutoRow>>,
    }

    impl InMemoryProductRepo {
        fn to_row(id: Uuid, product: &Product) -> ProdutoRow {
            ProdutoRow {
                id,
                nome: product.name().to_owned(),
                descricao: product.description().map(str::to_owned),
                preco: product.price(),
                sku: product.sku().to_owned(),
                quantidade: product.quantity(),
                categoria: product.category().map(str::to_owned),
            }
        }
    }

    #[async_trait]
    impl ProductRepo for InMemoryProductRepo {
        async fn create(&self, product: &Product) -> Result<Product, AppError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.values().any(|r| r.sku == product.sku()) {
                return Err(AppError::SkuAlreadyExists);
            }
            let id = Uuid::new_v4();
            let row = Self::to_row(id, product);
            rows.insert(id, row.clone());
            Product::from_existing(row)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
            let rows = self.rows.lock().unwrap();
            rows.get(&id).cloned().map(Product::from_existing).transpose()
        }

        async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
            let rows = self.rows.lock().unwrap();
            rows.values()
                .find(|r| r.sku == sku)
                .cloned()
                .map(Product::from_existing)
                .transpose()
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Product>, AppError> {
            let needle = name.to_lowercase();
            let rows = self.rows.lock().unwrap();
            rows.values()
                .find(|r| r.nome.to_lowercase().contains(&needle))
                .cloned()
                .map(Product::from_existing)
                .transpose()
        }

        async fn find_all(&self, search_term: Option<&str>) -> Result<Vec<Product>, AppError> {
            let needle = search_term.map(str::to_lowercase);
            let rows = self.rows.lock().unwrap();
            rows.values()
                .filter(|r| match &needle {
                    Some(t) => {
                        r.nome.to_lowercase().contains(t)
                            || r.sku.to_lowercase().contains(t)
                            || r.descricao
                                .as_deref()
                                .is_some_and(|d| d.to_lowercase().contains(t))
                    }
                    None => true,
                })
                .cloned()
                .map(Product::from_existing)
                .collect()
        }

        async fn update(&self, id: Uuid, product: &Product) -> Result<Option<Product>, AppError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.values().any(|r| r.sku == product.sku() && r.id != id) {
                return Err(AppError::SkuAlreadyExists);
            }
            if !rows.contains_key(&id) {
                return Ok(None);
            }
            let row = Self::to_row(id, product);
            rows.insert(id, row.clone());
            Product::from_existing(row).map(Some)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }

    fn service() -> ProductService {
        ProductService::new(Arc::new(InMemoryProductRepo::default()))
    }

    fn caneta_payload() -> CreateProductPayload {
        CreateProductPayload {
            name: "Caneta".into(),
            description: Some("Esferográfica azul".into()),
            price: Decimal::new(25, 1),
            sku: "CN-01".into(),
            quantity: 100,
            category: None,
        }
    }

    #[tokio::test]
    async fn create_com_sku_duplicado_devolve_none() {
        let service = service();

        let primeiro = service.create(caneta_payload()).await.unwrap();
        assert!(primeiro.is_some());

        let segundo = service.create(caneta_payload()).await.unwrap();
        assert!(segundo.is_none());

        // O produto original não pode ter sido mexido pela tentativa.
        let id = primeiro.unwrap().id;
        let carregado = service.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(carregado.quantity, 100);
        assert_eq!(carregado.sku, "CN-01");
    }

    #[tokio::test]
    async fn update_vazio_e_noop_que_devolve_o_produto() {
        let service = service();
        let criado = service.create(caneta_payload()).await.unwrap().unwrap();

        let resultado = service
            .update_fields(criado.id, UpdateProductPayload::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resultado.name, criado.name);
        assert_eq!(resultado.quantity, criado.quantity);
        assert_eq!(resultado.sku, criado.sku);
    }

    #[tokio::test]
    async fn sku_de_outro_produto_conflita_e_o_proprio_passa() {
        let service = service();
        service.create(caneta_payload()).await.unwrap();

        let mut lapis = caneta_payload();
        lapis.name = "Lápis".into();
        lapis.sku = "LP-01".into();
        let lapis = service.create(lapis).await.unwrap().unwrap();

        // Tentar roubar o SKU da caneta deve falhar.
        let conflito = service
            .update_fields(
                lapis.id,
                UpdateProductPayload {
                    sku: Some("CN-01".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(conflito, Err(AppError::SkuAlreadyExists)));

        // Reafirmar o próprio SKU passa trivialmente.
        let proprio = service
            .update_fields(
                lapis.id,
                UpdateProductPayload {
                    sku: Some("LP-01".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(proprio.is_some());
    }

    #[tokio::test]
    async fn quantidade_vira_delta_por_increase_decrease() {
        let service = service();
        let criado = service.create(caneta_payload()).await.unwrap().unwrap();

        // 100 -> 90: baixa de 10.
        let atualizado = service
            .update_fields(
                criado.id,
                UpdateProductPayload {
                    quantity: Some(90),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(atualizado.quantity, 90);

        // 90 -> 1000: entrada de 910.
        let atualizado = service
            .update_fields(
                criado.id,
                UpdateProductPayload {
                    quantity: Some(1000),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(atualizado.quantity, 1000);

        // Baixa maior que o saldo falha e não altera nada.
        let erro = service
            .update_fields(
                criado.id,
                UpdateProductPayload {
                    quantity: Some(-1000),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(erro, Err(AppError::EstoqueInsuficiente)));

        let carregado = service.find_by_id(criado.id).await.unwrap().unwrap();
        assert_eq!(carregado.quantity, 1000);
    }

    #[tokio::test]
    async fn find_all_filtra_por_nome_sku_e_descricao() {
        let service = service();
        service.create(caneta_payload()).await.unwrap();

        let mut caderno = caneta_payload();
        caderno.name = "Caderno".into();
        caderno.sku = "CD-77".into();
        caderno.description = Some("Capa dura".into());
        service.create(caderno).await.unwrap();

        // Sem termo: tudo.
        assert_eq!(service.find_all(None).await.unwrap().len(), 2);

        // Por nome, sem diferenciar maiúsculas.
        let por_nome = service.find_all(Some("caNeTa")).await.unwrap();
        assert_eq!(por_nome.len(), 1);
        assert_eq!(por_nome[0].name, "Caneta");

        // Por SKU.
        assert_eq!(service.find_all(Some("cd-77")).await.unwrap().len(), 1);

        // Por descrição.
        assert_eq!(service.find_all(Some("capa")).await.unwrap().len(), 1);

        // Termo sem correspondência.
        assert!(service.find_all(Some("xyz")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_de_id_inexistente_devolve_false() {
        let service = service();
        assert!(!service.delete(Uuid::new_v4()).await.unwrap());
    }
}
