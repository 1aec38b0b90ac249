// src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One trading day as reported by the quote provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<u64>,
}

impl Quote {
    /// A quote carrying only a close price, the one field the returns engine reads.
    pub fn from_close(date: impl Into<String>, close: f64) -> Self {
        Quote {
            date: date.into(),
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}

/// Symbol and benchmark cumulative returns aligned by trading-day position,
/// plus their pointwise difference. All three series have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub symbol: String,
    pub benchmark: String,
    pub days: u32,
    pub returns: Vec<f64>,
    pub index: Vec<f64>,
    pub diffs: Vec<f64>,
}

impl ComparisonResult {
    pub fn trading_days(&self) -> usize {
        self.returns.len()
    }
}

/// Response shape of a function gateway proxy integration, with the chart
/// carried as a base64 body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedChartResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Query parameters accepted by the comparison routes.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CompareQuery {
    pub symbol: Option<String>,
    pub days: Option<String>,
}
