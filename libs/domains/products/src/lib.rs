//! Products Domain
//!
//! Product catalogue stored in MongoDB: create, update, delete, list by type
//! and field introspection. Mutations take a JSON body that is validated and
//! sanitized field by field, and require an HS256 bearer token.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, audit events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, authorization
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, update commands, field descriptors
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_products::{
//!     handlers,
//!     mongodb::MongoProductRepository,
//!     service::ProductService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("shop");
//!
//! let repository = MongoProductRepository::new(&db);
//! let auth = JwtAuth::new(&JwtConfig::new("a-shared-secret-of-at-least-32-chars")?);
//! let service = ProductService::new(repository, auth);
//!
//! let router = axum::Router::new().nest("/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod schema;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{FieldError, ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{ListQuery, Product, ProductFields, TypeFilter, UpdateCommand};
pub use mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use schema::{FieldDescriptor, FieldType};
pub use service::ProductService;
