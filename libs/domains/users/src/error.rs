use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match self {
            // Not-found and conflict carry no body
            UserError::NotFound(id) => {
                tracing::debug!(user_id = id, "User not found");
                StatusCode::NOT_FOUND.into_response()
            }
            UserError::DuplicateEmail(email) => {
                tracing::debug!(%email, "Rejected duplicate email");
                StatusCode::CONFLICT.into_response()
            }
            UserError::Validation(errors) => AppError::ValidationError(errors).into_response(),
            UserError::Storage(msg) => AppError::InternalServerError(msg).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            UserError::NotFound(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            UserError::DuplicateEmail("a@b.c".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            UserError::Storage("pool timed out".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let mut errors = ValidationErrors::new();
        errors.add("name", ValidationError::new("length"));
        assert_eq!(
            UserError::Validation(errors).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_storage_details_are_not_exposed() {
        let response = UserError::Storage("relation \"users\" does not exist".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(!body.contains("relation"));
        assert!(body.contains("An internal server error occurred"));
    }

    #[tokio::test]
    async fn test_conflict_has_empty_body() {
        let response = UserError::DuplicateEmail("a@b.c".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}
