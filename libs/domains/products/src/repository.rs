use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductFields, TypeFilter, UpdateCommand};

/// Repository trait for Product persistence
///
/// The store is the authority on shape: documents it refuses surface as
/// `ProductError::SchemaViolation`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product under a freshly generated id
    async fn create(&self, fields: ProductFields) -> ProductResult<Product>;

    /// Apply `command` to the product with `id`; `false` when no product matched
    async fn update(&self, id: Uuid, command: UpdateCommand) -> ProductResult<bool>;

    /// Remove the product with `id`; `false` when no product matched
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Products matching `filter`, most expensive first
    async fn list(&self, filter: TypeFilter) -> ProductResult<Vec<Product>>;
}
