//! Product listing query extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use pantry_core::{ListFilter, PantryError};
use pantry_service::ListProductsQuery;

/// Extracts a normalized [`ListFilter`] from the query string.
///
/// Malformed parameters and `page`/`limit` below 1 are rejected with 400.
#[derive(Debug, Clone)]
pub struct ListParams(pub ListFilter);

#[async_trait]
impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListProductsQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| PantryError::validation(rejection.body_text()))?;

        Ok(Self(query.into_filter()?))
    }
}
