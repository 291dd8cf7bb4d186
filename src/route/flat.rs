use super::edge::Conversion;
use crate::models::Token;

/// Constant-price edge with unbounded liquidity.
///
/// Prices are kept in the pair's quoted direction; the reversed
/// edge only flips `inverted`, so reversing twice is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEdge {
    from: Token,
    to: Token,
    quoted_bid: f64,
    quoted_ask: f64,
    inverted: bool,
}

impl FlatEdge {
    /// Both prices must be positive and finite; callers validate untrusted input.
    pub fn new(from: impl Into<Token>, to: impl Into<Token>, bid_price: f64, ask_price: f64) -> Self {
        debug_assert!(
            bid_price.is_finite() && bid_price > 0.0,
            "bid price must be positive, got {bid_price}"
        );
        debug_assert!(
            ask_price.is_finite() && ask_price > 0.0,
            "ask price must be positive, got {ask_price}"
        );
        Self {
            from: from.into(),
            to: to.into(),
            quoted_bid: bid_price,
            quoted_ask: ask_price,
            inverted: false,
        }
    }

    /// Quote received per unit of `from` sold.
    pub fn bid_price(&self) -> f64 {
        if self.inverted {
            1.0 / self.quoted_ask
        } else {
            self.quoted_bid
        }
    }

    /// Quote paid per unit of `from` bought.
    pub fn ask_price(&self) -> f64 {
        if self.inverted {
            1.0 / self.quoted_bid
        } else {
            self.quoted_ask
        }
    }
}

impl Conversion for FlatEdge {
    fn from_token(&self) -> &str {
        &self.from
    }

    fn to_token(&self) -> &str {
        &self.to
    }

    fn simulate_sell(&self, amount: f64) -> Option<f64> {
        Some(amount * self.bid_price())
    }

    fn simulate_buy(&self, amount: f64) -> Option<f64> {
        Some(amount * self.ask_price())
    }

    fn reverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            quoted_bid: self.quoted_bid,
            quoted_ask: self.quoted_ask,
            inverted: !self.inverted,
        }
    }
}
