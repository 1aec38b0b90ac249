// src/services/error.rs
use thiserror::Error;

/// Stable discriminant of a [`CompareError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Provider,
    ProviderData,
    Computation,
    IncomparableSeries,
    Timeout,
    InvalidInput,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    /// Network, transport, authentication or non-success status from the quote provider.
    #[error("Quote provider error: {0}")]
    Provider(String),

    /// The provider answered, but the payload was malformed or missing fields.
    #[error("Quote provider returned bad data: {0}")]
    ProviderData(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Can't compare unequal series: {returns} symbol returns vs {index} index returns")]
    IncomparableSeries { returns: usize, index: usize },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CompareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompareError::Provider(_) => ErrorKind::Provider,
            CompareError::ProviderData(_) => ErrorKind::ProviderData,
            CompareError::Computation(_) => ErrorKind::Computation,
            CompareError::IncomparableSeries { .. } => ErrorKind::IncomparableSeries,
            CompareError::Timeout(_) => ErrorKind::Timeout,
            CompareError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Machine-readable code surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Provider => "provider_error",
            ErrorKind::ProviderData => "provider_data_error",
            ErrorKind::Computation => "computation_error",
            ErrorKind::IncomparableSeries => "incomparable_series",
            ErrorKind::Timeout => "timeout",
            ErrorKind::InvalidInput => "invalid_request",
        }
    }
}

impl From<reqwest::Error> for CompareError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompareError::Timeout(format!("Quote provider did not answer in time: {}", err))
        } else if err.is_decode() {
            CompareError::ProviderData(format!("Response was invalid json: {}", err))
        } else {
            CompareError::Provider(format!("Error talking to quote provider: {}", err))
        }
    }
}
