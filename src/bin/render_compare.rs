use anyhow::{anyhow, Context, Result};
use dotenv::dotenv;
use log::info;
use std::env;

use spcomp::config::AppConfig;
use spcomp::services::chart::render_comparison;
use spcomp::services::compare::Comparer;
use spcomp::services::tradier::TradierClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let (symbol, days, output) = parse_args(env::args().skip(1), config.default_days)?;

    let comparer = Comparer::new(TradierClient::new(config.tradier.clone())?)
        .with_benchmark(config.benchmark.clone())
        .with_deadline(config.request_deadline);
    let result = comparer.compare(&symbol, days).await?;

    if let (Some(r), Some(i), Some(d)) = (result.returns.last(), result.index.last(), result.diffs.last()) {
        info!(
            "{} over {} trading days: symbol {:.2}%, index {:.2}%, difference {:.2}%",
            result.symbol,
            result.trading_days(),
            r * 100.0,
            i * 100.0,
            d * 100.0
        );
    }

    std::fs::write(&output, render_comparison(&result))
        .with_context(|| format!("Failed to write {}", output))?;
    info!("Wrote chart to {}", output);
    Ok(())
}

/// `<symbol> [days] [output.svg]`, with the symbol upper-cased the way the HTTP routes do it.
fn parse_args(mut args: impl Iterator<Item = String>, default_days: u32) -> Result<(String, u32, String)> {
    let symbol = args
        .next()
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("usage: render_compare <symbol> [days] [output.svg]"))?;
    let days: u32 = match args.next() {
        Some(days) => days.parse().context("days must be a positive number")?,
        None => default_days,
    };
    let output = args
        .next()
        .unwrap_or_else(|| format!("{}.svg", symbol.to_lowercase()));
    Ok((symbol, days, output))
}
