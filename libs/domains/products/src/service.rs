//! Product Service - Business logic layer

use axum_helpers::JwtAuth;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, TypeFilter, UpdateCommand};
use crate::repository::ProductRepository;
use crate::schema::{self, FieldDescriptor};
use crate::validation;

/// Product service providing business logic operations
///
/// Mutations run in a fixed order: body validation, then bearer-token
/// authorization, then the store call. A request that fails validation is
/// rejected before its token is looked at.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, auth: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
        }
    }

    /// Validate, authorize and insert a new product
    #[instrument(skip(self, body, token))]
    pub async fn create_product(&self, body: &Value, token: Option<&str>) -> ProductResult<Product> {
        let validated = validation::validate(body).map_err(ProductError::Validation)?;
        self.auth.authorize(token)?;

        let fields = validated.into_fields()?;
        self.repository.create(fields).await
    }

    /// Validate, authorize and apply a partial update.
    ///
    /// An id with no product is not an error. Shape errors are reported as
    /// plain store errors.
    #[instrument(skip(self, body, token))]
    pub async fn update_product(
        &self,
        id: Uuid,
        body: &Value,
        token: Option<&str>,
    ) -> ProductResult<()> {
        let validated = validation::validate(body).map_err(ProductError::Validation)?;
        self.auth.authorize(token)?;

        let fields = validated.into_fields().map_err(ProductError::into_store)?;
        let matched = self
            .repository
            .update(id, UpdateCommand::from_fields(fields))
            .await
            .map_err(ProductError::into_store)?;

        if !matched {
            tracing::warn!(product_id = %id, "Update matched no product");
        }
        Ok(())
    }

    /// Authorize and delete; deleting an unknown id succeeds
    #[instrument(skip(self, token))]
    pub async fn delete_product(&self, id: Uuid, token: Option<&str>) -> ProductResult<()> {
        self.auth.authorize(token)?;

        if !self.repository.delete(id).await? {
            tracing::warn!(product_id = %id, "Delete matched no product");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: TypeFilter) -> ProductResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    pub fn schema(&self) -> Vec<FieldDescriptor> {
        schema::describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductFields;
    use crate::repository::MockProductRepository;
    use axum_helpers::{AuthError, JwtConfig};
    use mockall::predicate::eq;
    use serde_json::json;

    const SECRET: &str = "products-service-test-secret-012345";

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
    }

    fn token() -> String {
        auth().issue("admin", 300).unwrap()
    }

    fn service(repo: MockProductRepository) -> ProductService<MockProductRepository> {
        ProductService::new(repo, auth())
    }

    fn cola() -> Value {
        json!({ "name": "Cola", "price": "2.5", "imgUrl": "https://img/cola.png", "type": "soda" })
    }

    #[tokio::test]
    async fn test_create_persists_sanitized_fields() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|fields| {
                fields.name == "Cola" && fields.price == 2.5 && fields.product_type.as_deref() == Some("soda")
            })
            .times(1)
            .returning(|fields| Ok(Product::new(Uuid::new_v4(), fields)));

        let product = service(repo)
            .create_product(&cola(), Some(&token()))
            .await
            .unwrap();
        assert_eq!(product.name, "Cola");
    }

    #[tokio::test]
    async fn test_validation_runs_before_authorization() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let result = service(repo).create_product(&json!({}), None).await;
        match result {
            Err(ProductError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_requires_valid_token() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();
        let service = service(repo);

        assert!(matches!(
            service.create_product(&cola(), None).await,
            Err(ProductError::Unauthorized(AuthError::MissingToken))
        ));
        assert!(matches!(
            service.create_product(&cola(), Some("forged")).await,
            Err(ProductError::Unauthorized(AuthError::InvalidToken(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_structured_type() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let mut body = cola();
        body["type"] = json!({ "$gt": "" });
        let result = service(repo).create_product(&body, Some(&token())).await;
        assert!(matches!(result, Err(ProductError::SchemaViolation(_))));
    }

    #[tokio::test]
    async fn test_update_clears_flavours_when_omitted() {
        let id = Uuid::new_v4();
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .withf(move |target, command| *target == id && command.unset == vec!["flavours"])
            .times(1)
            .returning(|_, _| Ok(true));

        service(repo)
            .update_product(id, &cola(), Some(&token()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_succeeds() {
        let mut repo = MockProductRepository::new();
        repo.expect_update().returning(|_, _| Ok(false));

        let result = service(repo)
            .update_product(Uuid::new_v4(), &cola(), Some(&token()))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_reports_schema_violations_as_store_errors() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .returning(|_, _| Err(ProductError::SchemaViolation("Document failed validation".into())));

        let result = service(repo)
            .update_product(Uuid::new_v4(), &cola(), Some(&token()))
            .await;
        assert!(matches!(result, Err(ProductError::Store(msg)) if msg == "Document failed validation"));
    }

    #[tokio::test]
    async fn test_delete_requires_token_and_ignores_missing_product() {
        let id = Uuid::new_v4();
        let mut repo = MockProductRepository::new();
        repo.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(false));
        let service = service(repo);

        assert!(matches!(
            service.delete_product(id, None).await,
            Err(ProductError::Unauthorized(_))
        ));
        assert!(service.delete_product(id, Some(&token())).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_passes_filter_through() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .with(eq(TypeFilter::Exact("soda".into())))
            .returning(|_| {
                Ok(vec![Product::new(
                    Uuid::new_v4(),
                    ProductFields {
                        name: "Cola".into(),
                        ..Default::default()
                    },
                )])
            });

        let products = service(repo)
            .list_products(TypeFilter::Exact("soda".into()))
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_schema_hides_identifier() {
        let service = service(MockProductRepository::new());
        assert!(service.schema().iter().all(|f| f.key != "_id"));
    }
}
