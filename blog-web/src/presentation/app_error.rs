use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use super::views;
use crate::domain::error::DomainError;

#[derive(Debug, Error)]
#[error(transparent)]
pub(crate) struct AppError(#[from] DomainError);

pub(crate) type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, message) = match &err {
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
            DomainError::ConstraintViolation(_) => {
                warn!(error = %err, "constraint violated");
                (StatusCode::CONFLICT, err.to_string())
            }
            DomainError::Unexpected(_) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, views::error_page(status, &message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::AppError;
    use crate::domain::error::DomainError;

    fn status_of(err: DomainError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(
            status_of(DomainError::NotFound("post id: 1".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::Validation {
                field: "title",
                message: "must not be empty"
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::ConstraintViolation("posts_category_id_fkey".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::Unexpected("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
