use anyhow::{anyhow, Result};
use dotenv::dotenv;
use env_logger;
use log::{error, info};
use std::env;

use spcomp::config::AppConfig;
use spcomp::services::provider::QuoteProvider;
use spcomp::services::tradier::TradierClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let symbol = env::args().nth(1).unwrap_or_else(|| "VOO".to_string());
    let days: u32 = match env::args().nth(2) {
        Some(days) => days.parse().map_err(|_| anyhow!("days must be a positive number"))?,
        None => 28,
    };

    let config = AppConfig::from_env()?;
    info!("Testing Tradier daily history for {} over {} days...", symbol, days);

    let client = TradierClient::new(config.tradier)?;
    match client.fetch(&symbol, days).await {
        Ok(quotes) => {
            info!("SUCCESS: {} daily quotes", quotes.len());
            if let (Some(first), Some(last)) = (quotes.first(), quotes.last()) {
                info!("First: {} close {}", first.date, first.close);
                info!("Last: {} close {}", last.date, last.close);
            }
        }
        Err(e) => {
            error!("ERROR: Failed to fetch Tradier history: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
