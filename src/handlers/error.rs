// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

use crate::services::error::{CompareError, ErrorKind};

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message)
    }
}

// Provider details stay in the logs; clients get a stable message per kind.
impl From<&CompareError> for ApiError {
    fn from(err: &CompareError) -> Self {
        let (status, message) = match err.kind() {
            ErrorKind::Provider => (
                StatusCode::BAD_GATEWAY,
                "Unable to retrieve quotes from the market data provider".to_string(),
            ),
            ErrorKind::ProviderData => (
                StatusCode::BAD_GATEWAY,
                "The market data provider returned unexpected data".to_string(),
            ),
            ErrorKind::Computation => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Returns could not be computed from the available quotes".to_string(),
            ),
            ErrorKind::IncomparableSeries => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ErrorKind::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "The comparison took too long to complete".to_string(),
            ),
            ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, err.to_string()),
        };
        ApiError::new(status, err.code(), message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
