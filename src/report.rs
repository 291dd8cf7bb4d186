//! Runs both price searches over a market snapshot and renders the results.

use serde::Serialize;
use tracing::info;

use crate::errors::{Result, RouteError, RouteResult};
use crate::market::MarketSnapshot;
use crate::models::{Quote, Token, TradeSide};
use crate::route::BuyStrategy;
use crate::utils::format_route;

/// Result of one search, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Found(Quote),
    NoRoute,
    ArbitrageLoop,
    InvalidInput { reason: String },
}

impl From<RouteResult<Quote>> for Outcome {
    fn from(result: RouteResult<Quote>) -> Self {
        match result {
            Ok(quote) => Outcome::Found(quote),
            Err(RouteError::NoRoute) => Outcome::NoRoute,
            Err(RouteError::ArbitrageLoop) => Outcome::ArbitrageLoop,
            Err(RouteError::InvalidInput(reason)) => Outcome::InvalidInput { reason },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteReport {
    pub side: TradeSide,
    pub base: Token,
    pub quote: Token,
    pub amount: f64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl QuoteReport {
    /// Two-line text form: the route then the rate, or a single failure line.
    pub fn render_text(&self) -> String {
        let failure = |what: &str| format!("{}->{} {} route: {what}", self.base, self.quote, self.side);
        match &self.outcome {
            Outcome::Found(q) => format!("{}\n{:.6}", format_route(&q.path), q.rate),
            Outcome::NoRoute => failure("not feasible"),
            Outcome::ArbitrageLoop => failure("arbitrage loop detected"),
            Outcome::InvalidInput { reason } => failure(&format!("invalid input ({reason})")),
        }
    }
}

/// Price the buy side, then the sell side, of the snapshot's query.
pub fn evaluate(snapshot: &MarketSnapshot, strategy: BuyStrategy) -> Vec<QuoteReport> {
    let MarketSnapshot {
        base,
        quote,
        amount,
        graph,
    } = snapshot;

    [TradeSide::Buy, TradeSide::Sell]
        .into_iter()
        .map(|side| {
            let result = match side {
                TradeSide::Buy => graph.best_buy_rate_with(base, quote, *amount, strategy),
                TradeSide::Sell => graph.best_sell_rate(base, quote, *amount),
            };
            let outcome = Outcome::from(result);
            match &outcome {
                Outcome::Found(q) => info!(
                    %side,
                    rate = q.rate,
                    route = %format_route(&q.path),
                    "[ROUTE] best route found"
                ),
                other => info!(%side, outcome = ?other, "[ROUTE] no finite price"),
            }
            QuoteReport {
                side,
                base: base.clone(),
                quote: quote.clone(),
                amount: *amount,
                outcome,
            }
        })
        .collect()
}

pub fn render_text(reports: &[QuoteReport]) -> String {
    reports
        .iter()
        .map(QuoteReport::render_text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_json(reports: &[QuoteReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}
