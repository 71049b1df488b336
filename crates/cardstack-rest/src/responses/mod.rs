//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cardstack_core::{CardstackError, ErrorResponse};
use serde::Serialize;

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub CardstackError);

impl From<CardstackError> for AppError {
    fn from(err: CardstackError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(ErrorResponse::from_error(&self.0));

        (status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_error() {
        let response = AppError(CardstackError::invalid_argument("id present")).into_response();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);

        let response = AppError(CardstackError::persistence("2 rows")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError(CardstackError::not_found("Card 3")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
