pub(crate) mod comment_repository;
pub(crate) mod post_repository;
pub(crate) mod taxonomy_repository;
pub(crate) mod user_repository;

use crate::domain::error::DomainError;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const NOT_NULL_VIOLATION: &str = "23502";

/// Constraint violations are surfaced as such; everything else is unexpected.
pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        match db_err.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) | Some(UNIQUE_VIOLATION) | Some(NOT_NULL_VIOLATION) => {
                return DomainError::ConstraintViolation(constraint);
            }
            _ => {}
        }
    }
    DomainError::Unexpected(err.to_string())
}
