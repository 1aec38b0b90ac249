// src/services/compare.rs
use log::{debug, info};
use std::time::Duration;

use crate::config::BENCHMARK_SYMBOL;
use crate::models::ComparisonResult;
use super::error::CompareError;
use super::provider::QuoteProvider;
use super::returns::{compare_series, cumulative_returns_for};

pub type Result<T> = std::result::Result<T, CompareError>;

/// Compares a symbol's cumulative returns against the benchmark.
pub struct Comparer<P> {
    provider: P,
    benchmark: String,
    deadline: Option<Duration>,
}

impl<P: QuoteProvider> Comparer<P> {
    pub fn new(provider: P) -> Self {
        Comparer {
            provider,
            benchmark: BENCHMARK_SYMBOL.to_string(),
            deadline: None,
        }
    }

    pub fn with_benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = benchmark.into();
        self
    }

    /// Fails the whole comparison with [`CompareError::Timeout`] once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    /// Cumulative returns for one symbol over `days` calendar days.
    pub async fn returns_for(&self, symbol: &str, days: u32) -> Result<Vec<f64>> {
        let quotes = self.provider.fetch(symbol, days).await?;
        debug!("{}: {} quotes over {} calendar days", symbol, quotes.len(), days);
        cumulative_returns_for(&quotes)
    }

    pub async fn compare(&self, symbol: &str, days: u32) -> Result<ComparisonResult> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(CompareError::InvalidInput("Symbol must not be empty".into()));
        }
        if days == 0 {
            return Err(CompareError::InvalidInput("Days must be a positive number".into()));
        }

        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(symbol, days))
                .await
                .map_err(|_| {
                    CompareError::Timeout(format!(
                        "Comparison of {} did not finish within {:?}",
                        symbol, deadline
                    ))
                })?,
            None => self.run(symbol, days).await,
        }
    }

    async fn run(&self, symbol: &str, days: u32) -> Result<ComparisonResult> {
        info!("Comparing {} against {} over {} days", symbol, self.benchmark, days);

        let (returns, index) = tokio::try_join!(
            self.returns_for(symbol, days),
            self.returns_for(&self.benchmark, days)
        )?;
        let (index, diffs) = compare_series(&returns, &index)?;

        info!("Compared {} over {} trading days", symbol, returns.len());
        Ok(ComparisonResult {
            symbol: symbol.to_string(),
            benchmark: self.benchmark.clone(),
            days,
            returns,
            index,
            diffs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubProvider {
        closes: HashMap<&'static str, Vec<f64>>,
        delay: Option<Duration>,
    }

    impl StubProvider {
        fn new(pairs: Vec<(&'static str, Vec<f64>)>) -> Self {
            StubProvider {
                closes: pairs.into_iter().collect(),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl QuoteProvider for StubProvider {
        async fn fetch(&self, symbol: &str, _days: u32) -> Result<Vec<Quote>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let closes = self
                .closes
                .get(symbol)
                .ok_or_else(|| CompareError::Provider("Tradier returned a 400".into()))?;
            Ok(closes
                .iter()
                .map(|c| Quote::from_close("2024-01-01", *c))
                .collect())
        }
    }

    #[tokio::test]
    async fn compares_against_benchmark() {
        let provider = StubProvider::new(vec![
            ("ACME", vec![100.0, 110.0, 99.0]),
            ("VOO", vec![50.0, 50.0, 51.0, 51.0]),
        ]);
        let result = Comparer::new(provider).compare("ACME", 30).await.unwrap();

        assert_eq!(result.symbol, "ACME");
        assert_eq!(result.benchmark, "VOO");
        assert_eq!(result.trading_days(), 3);
        assert_eq!(result.index.len(), 3);
        assert_eq!(result.diffs.len(), 3);
        assert!((result.returns[1] - 0.1).abs() < 1e-12);
        assert!((result.index[1] - 0.02).abs() < 1e-12);
        assert!((result.diffs[1] - 0.08).abs() < 1e-12);
        assert!((result.diffs[2] + 0.02).abs() < 1e-12);
    }

    #[tokio::test]
    async fn longer_symbol_history_is_incomparable() {
        let provider = StubProvider::new(vec![("ACME", vec![1.0, 2.0, 3.0]), ("VOO", vec![1.0, 2.0])]);
        let err = Comparer::new(provider).compare("ACME", 30).await.unwrap_err();
        assert_eq!(err, CompareError::IncomparableSeries { returns: 3, index: 2 });
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let provider = StubProvider::new(vec![("VOO", vec![1.0, 2.0])]);
        let err = Comparer::new(provider).compare("NOPE", 30).await.unwrap_err();
        assert_eq!(err, CompareError::Provider("Tradier returned a 400".into()));
    }

    #[tokio::test]
    async fn zero_close_is_a_computation_error() {
        let provider = StubProvider::new(vec![("ACME", vec![1.0, 0.0]), ("VOO", vec![1.0, 2.0])]);
        let err = Comparer::new(provider).compare("ACME", 30).await.unwrap_err();
        assert!(matches!(err, CompareError::Computation(_)));
    }

    #[tokio::test]
    async fn rejects_invalid_input() {
        let comparer = Comparer::new(StubProvider::new(vec![]));
        assert!(matches!(comparer.compare("ACME", 0).await, Err(CompareError::InvalidInput(_))));
        assert!(matches!(comparer.compare("  ", 5).await, Err(CompareError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn custom_benchmark_is_used() {
        let provider = StubProvider::new(vec![("ACME", vec![1.0, 2.0]), ("SPY", vec![1.0, 1.5])]);
        let comparer = Comparer::new(provider).with_benchmark("SPY");
        assert_eq!(comparer.benchmark(), "SPY");
        let result = comparer.compare("ACME", 10).await.unwrap();
        assert_eq!(result.benchmark, "SPY");
        assert!((result.diffs[1] - 0.5).abs() < 1e-12);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let mut provider = StubProvider::new(vec![("ACME", vec![1.0, 2.0]), ("VOO", vec![1.0, 2.0])]);
        provider.delay = Some(Duration::from_secs(60));
        let comparer = Comparer::new(provider).with_deadline(Duration::from_secs(5));
        let err = comparer.compare("ACME", 10).await.unwrap_err();
        assert!(matches!(err, CompareError::Timeout(_)));
    }
}
