//! Market description loader.
//!
//! Responsibilities:
//! • Parse the line-oriented market format into a ready `Graph`.
//! • Add every pair in both directions (forward edge plus its reverse).
//! • Report malformed input with the offending line number.
//!
//! Format:
//! ```text
//! BASE QUOTE [AMOUNT]        # AMOUNT defaults to 1
//! N                          # number of pairs
//! BASE QUOTE ASK BID         # flat pair, or ...
//! BASE QUOTE                 # ... order-book pair:
//! NA                         #   ask level count
//! PRICE QTY                  #   NA ask levels, best first
//! NB                         #   bid level count
//! PRICE QTY                  #   NB bid levels, best first
//! ```

use std::path::Path;

use tracing::{info, warn};

use crate::errors::{AppError, Result};
use crate::models::{PriceLevel, Token};
use crate::route::{DepthEdge, Edge, FlatEdge, Graph};

/// Query parameters plus the market they run against.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub base: Token,
    pub quote: Token,
    pub amount: f64,
    pub graph: Graph,
}

/// Read and parse a market description file.
pub fn load_market(path: impl AsRef<Path>) -> Result<MarketSnapshot> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let snapshot = parse_market(&text)?;
    info!(
        path = %path.display(),
        tokens = snapshot.graph.vertex_count(),
        edges = snapshot.graph.edge_count(),
        "[MARKET] market loaded"
    );
    Ok(snapshot)
}

pub fn parse_market(text: &str) -> Result<MarketSnapshot> {
    let mut lines = Lines::new(text);

    let (line, header) = lines.next_fields("header line")?;
    let (base, quote, amount) = match header.as_slice() {
        [base, quote] => (*base, *quote, 1.0),
        [base, quote, amount] => (*base, *quote, positive(line, amount, "amount")?),
        _ => return Err(market_error(line, "expected 'BASE QUOTE [AMOUNT]'")),
    };

    let pair_count = lines.next_count("pair count")?;
    let mut graph = Graph::new();
    for _ in 0..pair_count {
        let edge = read_pair(&mut lines)?;
        graph.add_pair(edge);
    }

    if let Some((line, _)) = lines.next_line() {
        warn!(line, "[MARKET] ignoring content after the last pair");
    }

    Ok(MarketSnapshot {
        base: base.to_string(),
        quote: quote.to_string(),
        amount,
        graph,
    })
}

fn read_pair(lines: &mut Lines<'_>) -> Result<Edge> {
    let (line, fields) = lines.next_fields("pair")?;
    match fields.as_slice() {
        [base, quote, ask, bid] => {
            let ask = positive(line, ask, "ask price")?;
            let bid = positive(line, bid, "bid price")?;
            Ok(FlatEdge::new(*base, *quote, bid, ask).into())
        }
        [base, quote] => {
            let asks = read_levels(lines, "ask")?;
            let bids = read_levels(lines, "bid")?;
            Ok(DepthEdge::new(*base, *quote, bids, asks).into())
        }
        _ => Err(market_error(line, "expected 'BASE QUOTE ASK BID' or 'BASE QUOTE'")),
    }
}

fn read_levels(lines: &mut Lines<'_>, side: &str) -> Result<Vec<PriceLevel>> {
    let count = lines.next_count(&format!("{side} level count"))?;
    let mut levels = Vec::with_capacity(count);
    for _ in 0..count {
        let (line, fields) = lines.next_fields(&format!("{side} level"))?;
        let [price, quantity] = fields.as_slice() else {
            return Err(market_error(line, format!("expected '{side} PRICE QTY'")));
        };
        let price = positive(line, price, "price")?;
        let quantity = parse_number(line, quantity, "quantity")?;
        if quantity < 0.0 {
            return Err(market_error(line, format!("negative quantity {quantity}")));
        }
        levels.push(PriceLevel::new(price, quantity));
    }
    Ok(levels)
}

/// Non-blank lines with their 1-based line numbers.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, Vec<&'a str>)> {
        for (i, raw) in self.inner.by_ref() {
            self.last_line = i + 1;
            let fields: Vec<&str> = raw.split_whitespace().collect();
            if !fields.is_empty() {
                return Some((i + 1, fields));
            }
        }
        None
    }

    fn next_fields(&mut self, what: &str) -> Result<(usize, Vec<&'a str>)> {
        self.next_line().ok_or_else(|| {
            market_error(self.last_line + 1, format!("unexpected end of input, expected {what}"))
        })
    }

    fn next_count(&mut self, what: &str) -> Result<usize> {
        let (line, fields) = self.next_fields(what)?;
        let [count] = fields.as_slice() else {
            return Err(market_error(line, format!("expected a single {what}")));
        };
        count
            .parse()
            .map_err(|e| market_error(line, format!("invalid {what} '{count}': {e}")))
    }
}

fn parse_number(line: usize, field: &str, what: &str) -> Result<f64> {
    let value: f64 = field
        .parse()
        .map_err(|e| market_error(line, format!("invalid {what} '{field}': {e}")))?;
    if !value.is_finite() {
        return Err(market_error(line, format!("{what} must be finite, got {field}")));
    }
    Ok(value)
}

fn positive(line: usize, field: &str, what: &str) -> Result<f64> {
    let value = parse_number(line, field, what)?;
    if value <= 0.0 {
        return Err(market_error(line, format!("{what} must be positive, got {field}")));
    }
    Ok(value)
}

fn market_error(line: usize, message: impl Into<String>) -> AppError {
    AppError::Market {
        line,
        message: message.into(),
    }
}
