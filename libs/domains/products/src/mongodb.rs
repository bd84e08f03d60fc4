//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_document},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductFields, TypeFilter, UpdateCommand};
use crate::repository::ProductRepository;

pub const COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Indexes for the category filter and the price-descending listing
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "type": 1 })
                .options(IndexOptions::builder().name("idx_type".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price_desc".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.hyphenated().to_string() }
    }

    fn build_filter(filter: &TypeFilter) -> Document {
        match filter {
            TypeFilter::All => doc! {},
            TypeFilter::Exact(kind) => doc! { "type": kind.as_str() },
            TypeFilter::AnyOf(kinds) => doc! { "type": { "$in": kinds.clone() } },
        }
    }

    fn build_update(command: &UpdateCommand) -> ProductResult<Document> {
        let mut update = doc! { "$set": to_document(&command.set)? };

        if !command.unset.is_empty() {
            let unset: Document = command
                .unset
                .iter()
                .map(|f| (f.to_string(), Bson::from("")))
                .collect();
            update.insert("$unset", unset);
        }

        Ok(update)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, fields), fields(product_name = %fields.name))]
    async fn create(&self, fields: ProductFields) -> ProductResult<Product> {
        let product = Product::new(Uuid::now_v7(), fields);

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self, command))]
    async fn update(&self, id: Uuid, command: UpdateCommand) -> ProductResult<bool> {
        let update = Self::build_update(&command)?;
        let result = self
            .collection
            .update_one(Self::id_filter(id), update)
            .await?;

        tracing::info!(
            product_id = %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "Product update applied"
        );
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        tracing::info!(product_id = %id, deleted = result.deleted_count, "Product delete applied");
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: TypeFilter) -> ProductResult<Vec<Product>> {
        let products: Vec<Product> = self
            .collection
            .find(Self::build_filter(&filter))
            .sort(doc! { "price": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(products)
    }
}
