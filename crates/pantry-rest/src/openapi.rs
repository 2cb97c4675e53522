//! OpenAPI documentation configuration.

use crate::controllers::HealthResponse;
use pantry_core::{ErrorResponse, FieldError, PageMeta, Product, ProductCategory, ProductId};
use pantry_service::CreateProductRequest;
use utoipa::OpenApi;

/// OpenAPI documentation for the Pantry catalog API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pantry Catalog API",
        version = "1.0.0",
        description = "Product catalog with read-through caching",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Product endpoints
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::list_products,
        crate::controllers::product_controller::search_products,
        crate::controllers::product_controller::get_product,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ProductId,
            ProductCategory,
            Product,
            PageMeta,
            CreateProductRequest,
            ErrorResponse,
            FieldError,
            HealthResponse,
        )
    ),
    tags(
        (name = "products", description = "Product catalog endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
