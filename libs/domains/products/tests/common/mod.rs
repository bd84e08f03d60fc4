//! Shared fixtures for products handler tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum_helpers::{JwtAuth, JwtConfig};
use domain_products::{
    Product, ProductError, ProductFields, ProductRepository, ProductResult, ProductService,
    TypeFilter, UpdateCommand, handlers,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub const SECRET: &str = "handler-tests-shared-secret-0123456789";

pub fn auth() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
}

pub fn bearer() -> String {
    format!("Bearer {}", auth().issue("admin", 300).unwrap())
}

/// Products kept in memory; clones share the same store
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn get(&self, id: Uuid) -> Option<Product> {
        self.products.read().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.products.read().unwrap().len()
    }

    pub fn insert(&self, fields: ProductFields) -> Product {
        let product = Product::new(Uuid::new_v4(), fields);
        self.products
            .write()
            .unwrap()
            .insert(product.id, product.clone());
        product
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, fields: ProductFields) -> ProductResult<Product> {
        Ok(self.insert(fields))
    }

    async fn update(&self, id: Uuid, command: UpdateCommand) -> ProductResult<bool> {
        let mut products = self.products.write().unwrap();
        let Some(product) = products.get_mut(&id) else {
            return Ok(false);
        };

        let set = command.set;
        product.name = set.name;
        product.price = set.price;
        product.img_url = set.img_url;
        product.api_url = set.api_url.or(product.api_url.take());
        product.out_of_stock = set.out_of_stock.or(product.out_of_stock);
        product.flavours = set.flavours.or(product.flavours);
        product.description = set.description.or(product.description.take());
        product.api_route = set.api_route.or(product.api_route.take());
        product.product_type = set.product_type.or(product.product_type.take());

        if command.unset.contains(&"flavours") {
            product.flavours = None;
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        Ok(self.products.write().unwrap().remove(&id).is_some())
    }

    async fn list(&self, filter: TypeFilter) -> ProductResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| match &filter {
                TypeFilter::All => true,
                TypeFilter::Exact(kind) => p.product_type.as_ref() == Some(kind),
                TypeFilter::AnyOf(kinds) => p
                    .product_type
                    .as_ref()
                    .is_some_and(|kind| kinds.contains(kind)),
            })
            .cloned()
            .collect();

        products.sort_by(|a, b| b.price.total_cmp(&a.price));
        Ok(products)
    }
}

/// Every call fails as the store would when unreachable
pub struct UnreachableRepository;

#[async_trait]
impl ProductRepository for UnreachableRepository {
    async fn create(&self, _fields: ProductFields) -> ProductResult<Product> {
        Err(ProductError::Store("connection refused".into()))
    }

    async fn update(&self, _id: Uuid, _command: UpdateCommand) -> ProductResult<bool> {
        Err(ProductError::Store("connection refused".into()))
    }

    async fn delete(&self, _id: Uuid) -> ProductResult<bool> {
        Err(ProductError::Store("connection refused".into()))
    }

    async fn list(&self, _filter: TypeFilter) -> ProductResult<Vec<Product>> {
        Err(ProductError::Store("connection refused".into()))
    }
}

pub fn app<R: ProductRepository + 'static>(repository: R) -> Router {
    handlers::router(ProductService::new(repository, auth()))
}

pub fn cola_fields() -> ProductFields {
    ProductFields {
        name: "Cola".into(),
        price: 2.5,
        img_url: "https://img.example/cola.png".into(),
        product_type: Some("soda".into()),
        ..Default::default()
    }
}
