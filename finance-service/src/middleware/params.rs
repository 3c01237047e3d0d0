use axum::async_trait;
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// `Path` whose rejection uses the JSON error envelope.
#[derive(Debug, Clone, Copy)]
pub struct PathParam<T>(pub T);

/// `Query` whose rejection uses the JSON error envelope.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

fn rejected(status: axum::http::StatusCode, text: String) -> AppError {
    if status.is_server_error() {
        AppError::InternalError(anyhow::anyhow!(text))
    } else {
        AppError::BadRequest(anyhow::anyhow!(text))
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| PathParam(value))
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| QueryParams(value))
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))
    }
}
