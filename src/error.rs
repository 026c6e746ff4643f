//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Optimistic update lost: the supplied version no longer matches
    #[error("compare-and-swap conflict")]
    CasConflict,

    /// The ring resolved no shard for the key
    #[error("unable to get shard for {0}")]
    NoShardForKey(String),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            // a dedicated status so clients can tell a lost race from a
            // transport failure
            CacheError::CasConflict => StatusCode::CONFLICT,
            CacheError::NoShardForKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cas_conflict_message_is_stable() {
        // clients match on this string; it is part of the wire contract
        assert_eq!(CacheError::CasConflict.to_string(), "compare-and-swap conflict");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CacheError::CasConflict.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CacheError::NoShardForKey("k".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CacheError::InvalidRequest("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
