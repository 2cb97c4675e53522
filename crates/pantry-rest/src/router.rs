//! Main application router.

use crate::{
    controllers::{health_controller, product_controller},
    middleware::{logging_middleware, rate_limit_middleware, timeout_middleware},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, Router};
use pantry_config::{RateLimitConfig, ServerConfig};
use pantry_resilience::RateLimiter;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
///
/// Rate limiting covers the product API only; health probes and the docs
/// are never throttled. Quotas are tracked per client IP, so the router must
/// be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    rate_limit: &RateLimitConfig,
) -> Router {
    let mut api_router = Router::new().nest("/products", product_controller::router());

    if rate_limit.enabled {
        let limiter = RateLimiter::per_minute(rate_limit.requests_per_minute);
        api_router = api_router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }

    let router = Router::new()
        // Health endpoints
        .merge(health_controller::router())
        // API v1
        .nest("/api/v1", api_router)
        .with_state(state)
        // Swagger UI and OpenAPI spec
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(middleware::from_fn_with_state(
            server_config.request_timeout(),
            timeout_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Pantry Catalog API v1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pantry_core::ProductPage;
    use pantry_service::MockProductService;
    use axum::extract::ConnectInfo;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn no_rate_limit() -> RateLimitConfig {
        RateLimitConfig {
            enabled: false,
            ..Default::default()
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_from(uri: &str, client: &str) -> Request<Body> {
        let addr: SocketAddr = client.parse().unwrap();
        let mut request = get(uri);
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    fn listing_service() -> MockProductService {
        let mut service = MockProductService::new();
        service
            .expect_list_products()
            .returning(|_| Ok(ProductPage::empty()));
        service
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_router(
            AppState::new(Arc::new(MockProductService::new())),
            &ServerConfig::default(),
            &no_rate_limit(),
        );

        for uri in ["/health", "/ready", "/live", "/"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = create_router(
            AppState::new(Arc::new(MockProductService::new())),
            &ServerConfig::default(),
            &no_rate_limit(),
        );

        let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_set() {
        let app = create_router(
            AppState::new(Arc::new(listing_service())),
            &ServerConfig::default(),
            &no_rate_limit(),
        );

        let response = app.oneshot(get("/api/v1/products")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    fn rate_limited_app(requests_per_minute: u32) -> Router {
        create_router(
            AppState::new(Arc::new(listing_service())),
            &ServerConfig::default(),
            &RateLimitConfig {
                enabled: true,
                requests_per_minute,
            },
        )
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_excess_requests() {
        let app = rate_limited_app(2);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(get_from("/api/v1/products", "10.0.0.1:5000"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(get_from("/api/v1/products", "10.0.0.1:5001"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = app.oneshot(get_from("/health", "10.0.0.1:5002")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_is_tracked_per_client() {
        let app = rate_limited_app(2);

        for _ in 0..3 {
            app.clone()
                .oneshot(get_from("/api/v1/products", "10.0.0.1:5000"))
                .await
                .unwrap();
        }
        let throttled = app
            .clone()
            .oneshot(get_from("/api/v1/products", "10.0.0.1:5000"))
            .await
            .unwrap();
        assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);

        let other = app
            .oneshot(get_from("/api/v1/products", "10.0.0.2:5000"))
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_slow_handler_hits_deadline() {
        let app = Router::new()
            .route(
                "/slow",
                axum::routing::get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(middleware::from_fn_with_state(
                Duration::from_millis(20),
                timeout_middleware,
            ));

        let response = app.oneshot(get("/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
