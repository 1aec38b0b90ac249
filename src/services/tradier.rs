// src/services/tradier.rs
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use log::{debug, error, info};
use reqwest::{header, Client};
use serde_json::Value;

use crate::config::TradierConfig;
use crate::models::Quote;
use super::error::CompareError;
use super::provider::QuoteProvider;

pub type Result<T> = std::result::Result<T, CompareError>;

/// Daily history client for the Tradier market data API.
pub struct TradierClient {
    config: TradierConfig,
    client: Client,
}

impl TradierClient {
    pub fn new(config: TradierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompareError::Provider(format!("Failed to build HTTP client: {}", e)))?;
        info!(
            "Tradier client ready (endpoint: {}, timeout: {:?})",
            config.base_url(),
            config.timeout
        );
        Ok(TradierClient { config, client })
    }

    async fn get_history(&self, symbol: &str, start: &str, end: &str) -> Result<Vec<Quote>> {
        let url = format!("{}/markets/history", self.config.base_url());
        info!("Fetching daily history for {} from {} to {}", symbol, start, end);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", "daily"),
                ("start", start),
                ("end", end),
            ])
            .bearer_auth(&self.config.token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status.is_server_error() || status.is_client_error() {
            error!("Tradier returned {} for {}", status, symbol);
            return Err(CompareError::Provider(format!(
                "Tradier returned a {}",
                status.as_u16()
            )));
        }

        let body = resp.text().await?;
        let quotes = parse_history(symbol, &body)?;
        debug!("Tradier returned {} daily quotes for {}", quotes.len(), symbol);
        Ok(quotes)
    }
}

#[async_trait]
impl QuoteProvider for TradierClient {
    async fn fetch(&self, symbol: &str, days: u32) -> Result<Vec<Quote>> {
        let (start, end) = history_window(Utc::now().date_naive(), days)?;
        self.get_history(symbol, &start, &end).await
    }
}

/// `(start, end)` dates for a window of `days` calendar days ending today.
pub fn history_window(today: NaiveDate, days: u32) -> Result<(String, String)> {
    let start = today
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            CompareError::InvalidInput(format!("A window of {} days reaches past the calendar", days))
        })?;
    Ok((
        start.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    ))
}

/// Decodes a `markets/history` body.
///
/// Tradier sends `"history": null` for an unknown symbol or a window without
/// trading days, and collapses a one-day history into a bare object instead of an array.
pub fn parse_history(symbol: &str, body: &str) -> Result<Vec<Quote>> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| CompareError::ProviderData(format!("Response was invalid json: {}", e)))?;

    let history = json
        .get("history")
        .ok_or_else(|| CompareError::ProviderData("Tradier did not return the expected data".into()))?;

    let days = match history {
        Value::Null => {
            return Err(CompareError::ProviderData(format!(
                "Tradier returned no history for {}",
                symbol
            )))
        }
        Value::Object(fields) => fields
            .get("day")
            .ok_or_else(|| CompareError::ProviderData("History is missing daily records".into()))?,
        other => {
            return Err(CompareError::ProviderData(format!(
                "Unexpected history payload: {}",
                other
            )))
        }
    };

    let quotes = match days {
        Value::Array(_) => serde_json::from_value::<Vec<Quote>>(days.clone()),
        Value::Object(_) => serde_json::from_value::<Quote>(days.clone()).map(|q| vec![q]),
        other => {
            return Err(CompareError::ProviderData(format!(
                "Unexpected daily records: {}",
                other
            )))
        }
    };

    quotes.map_err(|e| CompareError::ProviderData(format!("Malformed daily record: {}", e)))
}
