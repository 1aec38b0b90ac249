// src/config.rs
use anyhow::{anyhow, Context, Result};
use log::warn;
use std::env;
use std::time::Duration;

/// Reference symbol every comparison is measured against (an S&P 500 tracker).
pub const BENCHMARK_SYMBOL: &str = "VOO";
/// Calendar days compared when the request leaves `days` out.
pub const DEFAULT_DAYS: u32 = 365;
/// Longest window a request may ask for, one hundred years of calendar days.
pub const MAX_DAYS: u32 = 36_500;

const DEFAULT_PORT: u16 = 3030;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DEADLINE_SECS: u64 = 25;

#[derive(Clone)]
pub struct TradierConfig {
    pub token: String,
    pub use_sandbox: bool,
    pub timeout: Duration,
    /// Replaces the sandbox/production endpoint, e.g. for a local stand-in server.
    pub base_url: Option<String>,
}

impl TradierConfig {
    pub fn new(token: impl Into<String>, use_sandbox: bool) -> Self {
        TradierConfig {
            token: token.into(),
            use_sandbox,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        if let Some(base_url) = &self.base_url {
            base_url
        } else if self.use_sandbox {
            "https://sandbox.tradier.com/v1"
        } else {
            "https://api.tradier.com/v1"
        }
    }
}

// The token stays out of debug output.
impl std::fmt::Debug for TradierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradierConfig")
            .field("token", &"<redacted>")
            .field("use_sandbox", &self.use_sandbox)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub tradier: TradierConfig,
    pub benchmark: String,
    pub default_days: u32,
    pub request_deadline: Duration,
}

impl AppConfig {
    /// Reads the service configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", port))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let token = lookup("TRADIER_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("TRADIER_API_TOKEN must be set"))?;

        let use_sandbox = match lookup("TRADIER_SANDBOX") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("TRADIER_SANDBOX must be a boolean, got '{}'", value))?,
            None => {
                warn!("$TRADIER_SANDBOX not set, using the sandbox endpoint");
                true
            }
        };

        let timeout = seconds(&lookup, "TRADIER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let request_deadline = seconds(&lookup, "REQUEST_DEADLINE_SECS", DEFAULT_DEADLINE_SECS)?;

        Ok(AppConfig {
            port,
            tradier: TradierConfig {
                token,
                use_sandbox,
                timeout,
                base_url: lookup("TRADIER_BASE_URL")
                    .map(|url| url.trim().trim_end_matches('/').to_string())
                    .filter(|url| !url.is_empty()),
            },
            benchmark: BENCHMARK_SYMBOL.to_string(),
            default_days: DEFAULT_DAYS,
            request_deadline,
        })
    }
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| anyhow!("{} must be a positive number of seconds, got '{}'", key, value))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(anyhow!("unrecognised boolean '{}'", other)),
    }
}
