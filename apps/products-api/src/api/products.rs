//! Products API routes

use axum::Router;
use axum_helpers::JwtAuth;
use domain_products::{MongoProductRepository, ProductService, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::new(&state.db);
    let auth = JwtAuth::new(&state.config.jwt);
    handlers::router(ProductService::new(repository, auth))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoProductRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
