//! Shared data structures used throughout the application.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token identifier; graph vertices are tokens.
pub type Token = String;

/// One rung of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub quantity: f64,
}

impl PriceLevel {
    /// `price` must be positive and `quantity` non-negative, both finite.
    pub fn new(price: f64, quantity: f64) -> Self {
        debug_assert!(
            price.is_finite() && price > 0.0,
            "price must be positive, got {price}"
        );
        debug_assert!(
            quantity.is_finite() && quantity >= 0.0,
            "quantity must be non-negative, got {quantity}"
        );
        Self { price, quantity }
    }

    /// The same level seen from the opposite leg of the pair.
    ///
    /// Notional value is preserved: `quantity` units at `price` become
    /// `price * quantity` units at `1 / price`.
    pub fn inverted(&self) -> Self {
        Self {
            price: 1.0 / self.price,
            quantity: self.price * self.quantity,
        }
    }
}

/// Which side of the market a query prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Acquire `amount` base, minimizing the quote spent (consumes asks).
    Buy,
    /// Dispose of `amount` base, maximizing the quote acquired (consumes bids).
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => f.write_str("buy"),
            TradeSide::Sell => f.write_str("sell"),
        }
    }
}

/// Successful answer of a price search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Quote units per base unit.
    pub rate: f64,
    /// Total quote acquired (sell) or required (buy) for the whole amount.
    pub total: f64,
    /// Route ordered `base -> ... -> quote`.
    pub path: Vec<Token>,
}
