//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "0.1.0",
        description = "Product catalogue API backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;
