// src/services/provider.rs
use async_trait::async_trait;

use crate::models::Quote;
use super::error::CompareError;

/// Source of daily closes for a trailing window of calendar days.
///
/// Quotes come back oldest first, one per trading day, so a window of `days`
/// calendar days yields at most `days` quotes.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch(&self, symbol: &str, days: u32) -> Result<Vec<Quote>, CompareError>;
}
