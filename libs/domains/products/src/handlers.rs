//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, put},
};
use axum_extra::extract::Query;
use axum_helpers::{
    AppError, AuditContext, AuditEvent, AuditOutcome, BearerToken, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, InternalServerErrorResponse, UnauthorizedResponse,
        UnprocessableEntityResponse, ValidationErrorResponse,
    },
};
use serde_json::{Value, json};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{FieldError, ProductError, ProductResult};
use crate::models::{
    CreatedProduct, DeletedProduct, ListQuery, Product, TypeFilter, UpdatedProduct,
};
use crate::repository::ProductRepository;
use crate::schema::{FieldDescriptor, FieldType};
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        product_schema,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, CreatedProduct, UpdatedProduct, DeletedProduct,
            FieldDescriptor, FieldType, FieldError
        ),
        responses(
            ValidationErrorResponse,
            UnprocessableEntityResponse,
            UnauthorizedResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/schema", get(product_schema))
        .route("/{id}", put(update_product).delete(delete_product))
        .with_state(shared_service)
}

/// JSON body; a request without a JSON content type counts as an empty body
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Null),
        Err(rejection) => Err(rejection.into()),
    }
}

fn audit<T>(action: &str, resource: String, context: &AuditContext, result: &ProductResult<T>) {
    let event = match result {
        Ok(_) => AuditEvent::new(action, AuditOutcome::Success),
        Err(ProductError::Unauthorized(e)) => AuditEvent::new(action, AuditOutcome::Denied)
            .with_details(json!({ "reason": e.to_string() })),
        Err(e) => AuditEvent::new(action, AuditOutcome::Failure)
            .with_details(json!({ "error": e.to_string() })),
    };

    event.with_resource(resource).with_context(context).log();
}

/// Store failures outside create and update go to the fallback responder
fn unhandled_store_error(err: ProductError) -> AppError {
    match err {
        ProductError::Store(detail) => AppError::unhandled(detail),
        other => other.into(),
    }
}

/// List products, optionally filtered by type
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListQuery),
    responses(
        (status = 200, description = "Products, most expensive first", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = service
        .list_products(TypeFilter::from(query))
        .await
        .map_err(unhandled_store_error)?;
    Ok(Json(products))
}

/// Create a new product (bearer token required)
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(
        content = Object,
        description = "Product fields; numbers and booleans may be sent as strings"
    ),
    responses(
        (status = 200, description = "Product created", body = CreatedProduct),
        (status = 401, response = UnauthorizedResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    BearerToken(token): BearerToken,
    context: AuditContext,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreatedProduct>, AppError> {
    let body = json_body(payload)?;
    let result = service.create_product(&body, token.as_deref()).await;

    let resource = match &result {
        Ok(product) => format!("product:{}", product.id),
        Err(_) => "product".to_string(),
    };
    audit("product.create", resource, &context, &result);

    Ok(Json(CreatedProduct { product: result? }))
}

/// Describe the product fields
#[utoipa::path(
    get,
    path = "/schema",
    tag = "Products",
    responses(
        (status = 200, description = "Field descriptors", body = Vec<FieldDescriptor>)
    )
)]
async fn product_schema<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> Json<Vec<FieldDescriptor>> {
    Json(service.schema())
}

/// Replace the given fields of a product (bearer token required)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = Object, description = "Product fields; omitting flavours clears it"),
    responses(
        (status = 200, description = "Update applied", body = UpdatedProduct),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    BearerToken(token): BearerToken,
    context: AuditContext,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdatedProduct>, AppError> {
    let body = json_body(payload)?;
    let result = service.update_product(id, &body, token.as_deref()).await;
    audit("product.update", format!("product:{id}"), &context, &result);

    result?;
    Ok(Json(UpdatedProduct::default()))
}

/// Delete a product (bearer token required)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted, or never existed", body = DeletedProduct),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    BearerToken(token): BearerToken,
    context: AuditContext,
) -> Result<Json<DeletedProduct>, AppError> {
    let result = service.delete_product(id, token.as_deref()).await;
    audit("product.delete", format!("product:{id}"), &context, &result);

    result.map_err(unhandled_store_error)?;
    Ok(Json(DeletedProduct::default()))
}
