// src/handlers/compare.rs
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{error, info};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use warp::http::StatusCode;
use warp::reply::{json, with_header, Json};
use warp::{Rejection, Reply};

use super::error::ApiError;
use crate::config::MAX_DAYS;
use crate::models::{CompareQuery, ComparisonResult, EncodedChartResponse};
use crate::services::chart::{render_comparison, CONTENT_TYPE};
use crate::services::compare::Comparer;
use crate::services::provider::QuoteProvider;

const SYMBOL_PATTERN: &str = r"^[A-Za-z0-9.\-/^]{1,16}$";

fn symbol_regex() -> &'static Regex {
    static SYMBOL_RE: OnceLock<Regex> = OnceLock::new();
    SYMBOL_RE.get_or_init(|| Regex::new(SYMBOL_PATTERN).expect("symbol pattern compiles"))
}

pub struct CompareState<P> {
    pub comparer: Comparer<P>,
    pub default_days: u32,
}

/// Validates the query string into `(symbol, days)`, upper-casing the symbol.
/// `days` must lie in `1..=MAX_DAYS`.
pub fn parse_request(query: &CompareQuery, default_days: u32) -> Result<(String, u32), ApiError> {
    let symbol = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Must include 'symbol' query parameter"))?;

    if !symbol_regex().is_match(symbol) {
        return Err(ApiError::bad_request(format!("'{}' is not a valid symbol", symbol)));
    }

    let days = match query.days.as_deref() {
        Some(days) => days
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=MAX_DAYS).contains(d))
            .ok_or_else(|| ApiError::bad_request("'days' parameter must be a positive numeric value"))?,
        None => default_days,
    };

    Ok((symbol.to_ascii_uppercase(), days))
}

async fn run_comparison<P: QuoteProvider>(
    query: &CompareQuery,
    state: &CompareState<P>,
) -> Result<ComparisonResult, Rejection> {
    let (symbol, days) = parse_request(query, state.default_days).map_err(|e| {
        info!("Rejected comparison request: {}", e.message);
        warp::reject::custom(e)
    })?;

    info!("Handling comparison request for {} over {} days", symbol, days);
    state.comparer.compare(&symbol, days).await.map_err(|e| {
        error!("Comparison of {} failed: {}", symbol, e);
        warp::reject::custom(ApiError::from(&e))
    })
}

/// Chart of the comparison as an SVG image.
pub async fn get_comparison_chart<P: QuoteProvider>(
    query: CompareQuery,
    state: Arc<CompareState<P>>,
) -> Result<impl Reply, Rejection> {
    let result = run_comparison(&query, &state).await?;
    let svg = render_comparison(&result);
    info!("Returning chart for {} ({} bytes)", result.symbol, svg.len());
    Ok(with_header(svg, "content-type", CONTENT_TYPE))
}

/// The three aligned series as JSON.
pub async fn get_comparison_data<P: QuoteProvider>(
    query: CompareQuery,
    state: Arc<CompareState<P>>,
) -> Result<Json, Rejection> {
    let result = run_comparison(&query, &state).await?;
    Ok(json(&result))
}

/// The chart wrapped in a gateway proxy envelope with a base64 body.
pub async fn get_comparison_encoded<P: QuoteProvider>(
    query: CompareQuery,
    state: Arc<CompareState<P>>,
) -> Result<Json, Rejection> {
    let result = run_comparison(&query, &state).await?;
    Ok(json(&encode_chart(&render_comparison(&result))))
}

pub fn encode_chart(chart: &str) -> EncodedChartResponse {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), CONTENT_TYPE.to_string());
    EncodedChartResponse {
        status_code: StatusCode::OK.as_u16(),
        headers,
        body: STANDARD.encode(chart.as_bytes()),
        is_base64_encoded: true,
    }
}
