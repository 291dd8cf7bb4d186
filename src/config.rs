//! Configuration loader and application settings.

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{AppError, Result};
use crate::route::BuyStrategy;

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Market description to load.
    pub market_file: PathBuf,
    /// Buy-side search strategy.
    pub buy_strategy: BuyStrategy,
    pub output_format: OutputFormat,
    /// Overrides the amount given in the market file.
    pub trade_amount: Option<f64>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let market_file = lookup("MARKET_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                AppError::Config("Set MARKET_FILE env var to your market description".into())
            })?;

        let buy_strategy = match lookup("BUY_STRATEGY") {
            Some(raw) => raw.parse().map_err(AppError::Config)?,
            None => BuyStrategy::default(),
        };

        let output_format = match lookup("OUTPUT_FORMAT") {
            Some(raw) => raw.parse().map_err(AppError::Config)?,
            None => OutputFormat::default(),
        };

        let trade_amount = match lookup("TRADE_AMOUNT") {
            Some(raw) => {
                let amount: f64 = raw.trim().parse()?;
                if !amount.is_finite() || amount <= 0.0 {
                    return Err(AppError::Config(format!(
                        "TRADE_AMOUNT must be a positive number, got {raw}"
                    )));
                }
                Some(amount)
            }
            None => None,
        };

        Ok(Self {
            market_file,
            buy_strategy,
            output_format,
            trade_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("MARKET_FILE", "market.txt")]).unwrap();
        assert_eq!(cfg.market_file, PathBuf::from("market.txt"));
        assert_eq!(cfg.buy_strategy, BuyStrategy::BellmanFord);
        assert_eq!(cfg.output_format, OutputFormat::Text);
        assert_eq!(cfg.trade_amount, None);
    }

    #[test]
    fn reads_all_settings() {
        let cfg = config(&[
            ("MARKET_FILE", "m.txt"),
            ("BUY_STRATEGY", "uniform-cost"),
            ("OUTPUT_FORMAT", "JSON"),
            ("TRADE_AMOUNT", "2.5"),
        ])
        .unwrap();
        assert_eq!(cfg.buy_strategy, BuyStrategy::UniformCost);
        assert_eq!(cfg.output_format, OutputFormat::Json);
        assert_eq!(cfg.trade_amount, Some(2.5));
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(matches!(config(&[]), Err(AppError::Config(_))));
        assert!(matches!(
            config(&[("MARKET_FILE", "m.txt"), ("BUY_STRATEGY", "greedy")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config(&[("MARKET_FILE", "m.txt"), ("TRADE_AMOUNT", "abc")]),
            Err(AppError::ParseFloat(_))
        ));
        assert!(matches!(
            config(&[("MARKET_FILE", "m.txt"), ("TRADE_AMOUNT", "-1")]),
            Err(AppError::Config(_))
        ));
    }
}
