//! Directed conversion between two tokens.

use super::depth::DepthEdge;
use super::flat::FlatEdge;
use crate::models::TradeSide;

/// Capability shared by every liquidity model.
///
/// `simulate_sell` and `simulate_buy` return `None` when the edge cannot
/// absorb the full amount; partial fills are never reported.
pub trait Conversion {
    fn from_token(&self) -> &str;
    fn to_token(&self) -> &str;

    /// Sell `amount` units of the `from` token, returning the `to` token acquired.
    fn simulate_sell(&self, amount: f64) -> Option<f64>;

    /// Buy `amount` units of the `from` token, returning the `to` token required.
    fn simulate_buy(&self, amount: f64) -> Option<f64>;

    /// Edge for the opposite direction. Never mutates the receiver.
    fn reverse(&self) -> Self
    where
        Self: Sized;

    fn simulate(&self, side: TradeSide, amount: f64) -> Option<f64> {
        match side {
            TradeSide::Sell => self.simulate_sell(amount),
            TradeSide::Buy => self.simulate_buy(amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    Flat(FlatEdge),
    Depth(DepthEdge),
}

impl Edge {
    /// Forward edge followed by its reverse, as the market builder adds them.
    pub fn with_reverse(self) -> [Edge; 2] {
        let reverse = self.reverse();
        [self, reverse]
    }
}

impl Conversion for Edge {
    fn from_token(&self) -> &str {
        match self {
            Edge::Flat(e) => e.from_token(),
            Edge::Depth(e) => e.from_token(),
        }
    }

    fn to_token(&self) -> &str {
        match self {
            Edge::Flat(e) => e.to_token(),
            Edge::Depth(e) => e.to_token(),
        }
    }

    fn simulate_sell(&self, amount: f64) -> Option<f64> {
        match self {
            Edge::Flat(e) => e.simulate_sell(amount),
            Edge::Depth(e) => e.simulate_sell(amount),
        }
    }

    fn simulate_buy(&self, amount: f64) -> Option<f64> {
        match self {
            Edge::Flat(e) => e.simulate_buy(amount),
            Edge::Depth(e) => e.simulate_buy(amount),
        }
    }

    fn reverse(&self) -> Self {
        match self {
            Edge::Flat(e) => Edge::Flat(e.reverse()),
            Edge::Depth(e) => Edge::Depth(e.reverse()),
        }
    }
}

impl From<FlatEdge> for Edge {
    fn from(edge: FlatEdge) -> Self {
        Edge::Flat(edge)
    }
}

impl From<DepthEdge> for Edge {
    fn from(edge: DepthEdge) -> Self {
        Edge::Depth(edge)
    }
}
