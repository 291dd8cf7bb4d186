use std::sync::Arc;

use super::edge::Conversion;
use crate::models::{PriceLevel, Token};

/// Order-book edge with finite liquidity.
///
/// Both sides are stored in the pair's quoted direction and shared between
/// an edge and its reverse. Levels are ordered best price first.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthEdge {
    from: Token,
    to: Token,
    quoted_bids: Arc<[PriceLevel]>,
    quoted_asks: Arc<[PriceLevel]>,
    inverted: bool,
}

impl DepthEdge {
    /// Levels come from `PriceLevel::new`, which checks their prices.
    pub fn new(
        from: impl Into<Token>,
        to: impl Into<Token>,
        bid_levels: Vec<PriceLevel>,
        ask_levels: Vec<PriceLevel>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            quoted_bids: bid_levels.into(),
            quoted_asks: ask_levels.into(),
            inverted: false,
        }
    }

    /// Levels consumed when selling `from`.
    ///
    /// On a reversed edge these are the quoted asks, inverted.
    pub fn bid_levels(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.side(&self.quoted_bids, &self.quoted_asks)
    }

    /// Levels consumed when buying `from`.
    pub fn ask_levels(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.side(&self.quoted_asks, &self.quoted_bids)
    }

    /// Total `from` units the bid side can absorb.
    pub fn bid_depth(&self) -> f64 {
        self.bid_levels().map(|l| l.quantity).sum()
    }

    /// Total `from` units the ask side can deliver.
    pub fn ask_depth(&self) -> f64 {
        self.ask_levels().map(|l| l.quantity).sum()
    }

    fn side<'a>(
        &'a self,
        direct: &'a [PriceLevel],
        opposite: &'a [PriceLevel],
    ) -> impl Iterator<Item = PriceLevel> + 'a {
        let inverted = self.inverted;
        let levels = if inverted { opposite } else { direct };
        levels
            .iter()
            .map(move |l| if inverted { l.inverted() } else { *l })
    }
}

/// Share of the requested amount that may stay unfilled as rounding residue.
const FILL_TOLERANCE: f64 = 1e-12;

/// Walk `levels` until `amount` is filled, returning the counter amount.
///
/// A remainder within `FILL_TOLERANCE` of the request counts as filled, so an
/// amount carried from a previous hop can drain a book exactly.
fn fill(levels: impl Iterator<Item = PriceLevel>, mut amount: f64) -> Option<f64> {
    let requested = amount;
    let mut total = 0.0;
    for level in levels {
        if level.quantity < amount {
            total += level.price * level.quantity;
            amount -= level.quantity;
        } else {
            total += level.price * amount;
            amount = 0.0;
            break;
        }
    }

    // book exhausted before the amount was filled
    if amount > requested * FILL_TOLERANCE {
        return None;
    }
    Some(total)
}

impl Conversion for DepthEdge {
    fn from_token(&self) -> &str {
        &self.from
    }

    fn to_token(&self) -> &str {
        &self.to
    }

    fn simulate_sell(&self, amount: f64) -> Option<f64> {
        fill(self.bid_levels(), amount)
    }

    fn simulate_buy(&self, amount: f64) -> Option<f64> {
        fill(self.ask_levels(), amount)
    }

    fn reverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            quoted_bids: Arc::clone(&self.quoted_bids),
            quoted_asks: Arc::clone(&self.quoted_asks),
            inverted: !self.inverted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn levels(raw: &[(f64, f64)]) -> Vec<PriceLevel> {
        raw.iter().map(|&(p, q)| PriceLevel::new(p, q)).collect()
    }

    fn bid_book(raw: &[(f64, f64)]) -> DepthEdge {
        DepthEdge::new("A", "B", levels(raw), Vec::new())
    }

    fn ask_book(raw: &[(f64, f64)]) -> DepthEdge {
        DepthEdge::new("A", "B", Vec::new(), levels(raw))
    }

    #[test]
    fn sell_walks_bid_levels() {
        let edge = bid_book(&[(2.0, 10.0), (1.5, 5.0)]);
        assert_eq!(edge.simulate_sell(5.0), Some(10.0));
        assert_eq!(edge.simulate_sell(10.0), Some(20.0));
        assert_eq!(edge.simulate_sell(12.0), Some(23.0));
        assert_eq!(edge.simulate_sell(15.0), Some(27.5));
        assert_eq!(edge.simulate_sell(30.0), None);
        assert_eq!(edge.simulate_sell(0.0), Some(0.0));
    }

    #[test]
    fn buy_walks_ask_levels() {
        let edge = ask_book(&[(2.0, 10.0), (2.5, 5.0)]);
        assert_eq!(edge.simulate_buy(5.0), Some(10.0));
        assert_eq!(edge.simulate_buy(10.0), Some(20.0));
        assert_eq!(edge.simulate_buy(12.0), Some(25.0));
        assert_eq!(edge.simulate_buy(20.0), None);
        assert_eq!(edge.simulate_buy(0.0), Some(0.0));
    }

    #[test]
    fn empty_book_cannot_fill() {
        let edge = bid_book(&[]);
        assert_eq!(edge.simulate_sell(10.0), None);
        assert_eq!(edge.simulate_buy(10.0), None);
        assert_eq!(edge.simulate_sell(0.0), Some(0.0));
    }

    #[test]
    fn rounding_residue_still_drains_the_book() {
        let edge = bid_book(&[(2.0, 0.3)]);
        // 0.1 + 0.2 lands one ulp above 0.3
        let got = edge.simulate_sell(0.1 + 0.2).unwrap();
        assert!((got - 0.6).abs() < 1e-12);
        assert_eq!(edge.simulate_sell(0.31), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "price must be positive")]
    fn rejects_negative_level_price() {
        PriceLevel::new(-1.0, 5.0);
    }

    #[test]
    fn reverse_swaps_sides_preserving_notional() {
        let edge = DepthEdge::new(
            "KNC",
            "USDT",
            levels(&[(0.9, 100.0), (0.8, 300.0)]),
            levels(&[(1.1, 150.0), (1.2, 200.0)]),
        );
        let reverse = edge.reverse();
        assert_eq!(reverse.from_token(), "USDT");
        assert_eq!(reverse.to_token(), "KNC");

        let asks: Vec<_> = reverse.ask_levels().collect();
        assert_eq!(asks.len(), 2);
        assert!((asks[0].price - 1.0 / 0.9).abs() < 1e-12);
        assert!((asks[0].quantity - 90.0).abs() < 1e-12);
        assert!((asks[1].quantity - 240.0).abs() < 1e-12);

        let bids: Vec<_> = reverse.bid_levels().collect();
        assert!((bids[0].price - 1.0 / 1.1).abs() < 1e-12);
        assert!((bids[0].quantity - 165.0).abs() < 1e-12);
        assert!((reverse.bid_depth() - 405.0).abs() < 1e-9);
        assert!((edge.bid_depth() - 400.0).abs() < 1e-12);
    }

    #[test]
    fn reversed_sell_spends_the_forward_ask_book() {
        // selling 165 USDT back into the KNC asks fills exactly the first level
        let edge = DepthEdge::new(
            "KNC",
            "USDT",
            Vec::new(),
            levels(&[(1.1, 150.0), (1.2, 200.0)]),
        );
        let got = edge.reverse().simulate_sell(165.0).unwrap();
        assert!((got - 150.0).abs() < 1e-9);
        assert_eq!(edge.reverse().simulate_sell(1_000.0), None);
    }

    proptest! {
        #[test]
        fn double_reverse_restores_levels(
            raw in prop::collection::vec((1e-4f64..1e4, 0.0f64..1e6), 0..8)
        ) {
            let edge = DepthEdge::new("A", "B", levels(&raw), levels(&raw));
            let twice = edge.reverse().reverse();
            for (got, want) in twice.bid_levels().zip(raw.iter()) {
                prop_assert!((got.price - want.0).abs() <= 1e-9 * want.0.max(1.0));
                prop_assert!((got.quantity - want.1).abs() <= 1e-9 * want.1.max(1.0));
            }
            prop_assert_eq!(twice, edge);
        }
    }
}
