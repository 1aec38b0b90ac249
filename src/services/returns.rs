// src/services/returns.rs
//
// Cumulative percent returns from daily closes.
//
// Two quirks are kept on purpose because callers already depend on the output:
//   * the first daily change is computed against the first close itself, so it is always 0,
//     whatever the price was the day before the window;
//   * the cumulative series is pinned to 0 at position 0, so the first daily change
//     never contributes.
use log::{debug, warn};

use crate::models::Quote;
use super::error::CompareError;

pub type Result<T> = std::result::Result<T, CompareError>;

/// Daily percent changes, one per quote: `(close[i] - close[i-1]) / close[i-1]`,
/// with the first quote measured against itself.
pub fn daily_changes(quotes: &[Quote]) -> Result<Vec<f64>> {
    let first = quotes
        .first()
        .ok_or_else(|| CompareError::Computation("No quotes to compute daily changes from".into()))?;

    let mut changes = Vec::with_capacity(quotes.len());
    let mut prev = first.close;
    for quote in quotes {
        let curr = quote.close;
        if !curr.is_finite() || curr <= 0.0 {
            return Err(CompareError::Computation(format!(
                "Close price on {} is {}, cannot compute a percent change",
                quote.date, curr
            )));
        }
        changes.push((curr - prev) / prev);
        prev = curr;
    }

    Ok(changes)
}

/// Running sum of daily changes, anchored at 0.
pub fn cumulative_returns(changes: &[f64]) -> Result<Vec<f64>> {
    if changes.is_empty() {
        return Err(CompareError::Computation(
            "No daily changes to accumulate".into(),
        ));
    }

    let mut cumulative = Vec::with_capacity(changes.len());
    cumulative.push(0.0);
    for i in 1..changes.len() {
        cumulative.push(cumulative[i - 1] + changes[i]);
    }

    Ok(cumulative)
}

pub fn cumulative_returns_for(quotes: &[Quote]) -> Result<Vec<f64>> {
    let changes = daily_changes(quotes)?;
    cumulative_returns(&changes)
}

/// Trims the benchmark to the trailing `returns.len()` positions when the symbol has
/// traded fewer days than the benchmark. A longer symbol series is left alone.
pub fn align_index<'a>(returns: &[f64], index: &'a [f64]) -> &'a [f64] {
    if returns.len() < index.len() {
        warn!(
            "Symbol has {} trading days against {} for the index, keeping the last {}",
            returns.len(),
            index.len(),
            returns.len()
        );
        &index[index.len() - returns.len()..]
    } else {
        index
    }
}

/// Pointwise `returns[i] - index[i]`. Both series must have the same length.
pub fn subtract(returns: &[f64], index: &[f64]) -> Result<Vec<f64>> {
    if returns.len() != index.len() {
        return Err(CompareError::IncomparableSeries {
            returns: returns.len(),
            index: index.len(),
        });
    }

    Ok(returns.iter().zip(index).map(|(r, i)| r - i).collect())
}

/// Aligns the benchmark to the symbol and returns `(index, diffs)`.
pub fn compare_series(returns: &[f64], index: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let aligned = align_index(returns, index);
    let diffs = subtract(returns, aligned)?;
    debug!("Compared {} aligned trading days", diffs.len());
    Ok((aligned.to_vec(), diffs))
}
