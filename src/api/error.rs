use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong
    pub error: String,
}

impl Error {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            Self::StockNotFound { .. } | Self::LogEntryNotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateStock { .. } => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = if status.is_server_error() {
            tracing::error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use axum::body::to_bytes;
    use sea_orm::DbErr;

    #[tokio::test]
    async fn test_client_errors_carry_their_message() {
        let response = Error::InsufficientStock {
            available: 15,
            requested: 20,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "Insufficient stock: 15 boxes available, 20 requested"
        );
    }

    #[tokio::test]
    async fn test_database_errors_are_masked() {
        let response = Error::Database(DbErr::Custom("disk on fire".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::StockNotFound { key: "1".to_string() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DuplicateStock {
                company: "Acme".to_string(),
                tile_name: "Marble".to_string(),
                tile_size: "2x2".to_string(),
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Forbidden { username: "x".to_string() }.status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
