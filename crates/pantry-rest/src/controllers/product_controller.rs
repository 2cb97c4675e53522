//! Product catalog controller.

use crate::{
    extractors::{ListParams, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pantry_core::{ErrorResponse, ListFilter, PageMeta, PantryError, Product, ProductId};
use pantry_service::{CreateProductRequest, ListProductsQuery};
use tracing::info;

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/list", post(search_products))
        .route("/:id", get(get_product))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Malformed JSON", body = ApiResponse<ErrorResponse>),
        (status = 409, description = "Same name and type already exists", body = ApiResponse<ErrorResponse>),
        (status = 422, description = "Validation failed", body = ApiResponse<ErrorResponse>)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    info!(name = %request.name, "Received request to create product");

    let product = state
        .product_service
        .create_product(request.into_new_product()?)
        .await?;

    Ok(created(product, "product created successfully"))
}

/// List products.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Invalid query parameters", body = ApiResponse<ErrorResponse>)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    ListParams(filter): ListParams,
) -> ApiResult<Vec<Product>> {
    fetch_page(&state, &filter).await
}

/// List products (POST form kept for existing clients).
#[utoipa::path(
    post,
    path = "/api/v1/products/list",
    tag = "products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Invalid query parameters", body = ApiResponse<ErrorResponse>)
    )
)]
pub async fn search_products(
    State(state): State<AppState>,
    ListParams(filter): ListParams,
) -> ApiResult<Vec<Product>> {
    fetch_page(&state, &filter).await
}

async fn fetch_page(state: &AppState, filter: &ListFilter) -> ApiResult<Vec<Product>> {
    info!(
        query = %filter.query,
        page = filter.page,
        page_size = filter.page_size,
        "Received request to list products"
    );

    let page = state.product_service.list_products(filter).await?;
    let meta = PageMeta::new(filter.page, filter.page_size, page.total);

    Ok(Json(
        ApiResponse::new(StatusCode::OK, "successfully fetched products", page.items).with_meta(meta),
    ))
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<Product>),
        (status = 400, description = "Malformed product ID", body = ApiResponse<ErrorResponse>),
        (status = 404, description = "Product not found", body = ApiResponse<ErrorResponse>)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    info!(product_id = %id, "Received request to get product");

    let id = ProductId::parse(&id)
        .map_err(|_| PantryError::validation(format!("Invalid product ID: {id}")))?;

    let product = state.product_service.get_product(id).await?;
    ok(product, "successfully fetched product")
}
