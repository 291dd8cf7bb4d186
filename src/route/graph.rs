//! Token graph and the buy/sell price searches.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::edge::{Conversion, Edge};
use super::path;
use super::queue::PriceQueue;
use crate::errors::{RouteError, RouteResult};
use crate::models::{Quote, Token, TradeSide};

/// Fraction by which a label must move to count as an improvement.
const RELATIVE_TOLERANCE: f64 = 1e-12;

/// How the buy side computes its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuyStrategy {
    /// Bounded relaxation with an explicit arbitrage check.
    #[default]
    BellmanFord,
    /// Dijkstra-style expansion over a `PriceQueue`. Its result is accepted
    /// only when no edge can still lower a label; otherwise the
    /// Bellman-Ford search decides.
    ///
    /// Exact ties go to the route settled first, which need not be the one
    /// Bellman-Ford picks. The required amount is the same either way.
    UniformCost,
}

impl FromStr for BuyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bellman-ford" | "bellman_ford" | "bf" => Ok(BuyStrategy::BellmanFord),
            "uniform-cost" | "uniform_cost" | "ucs" => Ok(BuyStrategy::UniformCost),
            other => Err(format!("unknown buy strategy '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
struct Link {
    target: usize,
    edge: Edge,
}

/// Adjacency from each token to its outgoing edges.
///
/// Tokens and edges keep insertion order, so every search visits them in the
/// same order and ties go to the first edge added.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    tokens: Vec<Token>,
    index: HashMap<Token, usize>,
    adjacency: Vec<Vec<Link>>,
}

/// Per-query labels: quote acquired (sell) or required (buy) at each vertex.
struct Labels {
    side: TradeSide,
    values: Vec<f64>,
    predecessors: Vec<Option<usize>>,
}

impl Labels {
    fn new(side: TradeSide, vertex_count: usize, base: usize, amount: f64) -> Self {
        let unreached = match side {
            TradeSide::Sell => 0.0,
            TradeSide::Buy => f64::INFINITY,
        };
        let mut values = vec![unreached; vertex_count];
        values[base] = amount;
        Self {
            side,
            values,
            predecessors: vec![None; vertex_count],
        }
    }

    fn is_reached(&self, vertex: usize) -> bool {
        let value = self.values[vertex];
        match self.side {
            TradeSide::Sell => value > 0.0,
            TradeSide::Buy => value.is_finite(),
        }
    }

    fn improves(&self, candidate: f64, vertex: usize) -> bool {
        let current = self.values[vertex];
        match self.side {
            TradeSide::Sell if current <= 0.0 => candidate > 0.0,
            TradeSide::Sell => candidate > current * (1.0 + RELATIVE_TOLERANCE),
            TradeSide::Buy if current.is_infinite() => candidate.is_finite(),
            TradeSide::Buy => candidate < current * (1.0 - RELATIVE_TOLERANCE),
        }
    }

    /// The starting token ended up better off than it began.
    fn base_gained(&self, base: usize, amount: f64) -> bool {
        match self.side {
            TradeSide::Sell => self.values[base] > amount,
            TradeSide::Buy => self.values[base] < amount,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    fn intern(&mut self, token: &str) -> usize {
        if let Some(&i) = self.index.get(token) {
            return i;
        }
        let i = self.tokens.len();
        self.tokens.push(token.to_string());
        self.index.insert(token.to_string(), i);
        self.adjacency.push(Vec::new());
        i
    }

    /// Add a single directed edge. Both endpoints become vertices.
    pub fn add_edge(&mut self, edge: Edge) {
        let source = self.intern(edge.from_token());
        let target = self.intern(edge.to_token());
        self.adjacency[source].push(Link { target, edge });
    }

    /// Add `edge` and its reverse.
    pub fn add_pair(&mut self, edge: Edge) {
        for e in edge.with_reverse() {
            self.add_edge(e);
        }
    }

    pub fn neighbors(&self, token: &str) -> impl Iterator<Item = &Edge> + '_ {
        self.index
            .get(token)
            .map(|&i| self.adjacency[i].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|link| &link.edge)
    }

    /// Vertices in insertion order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn vertex_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Maximum quote obtainable by selling `amount` of `base`.
    pub fn best_sell_rate(&self, base: &str, quote: &str, amount: f64) -> RouteResult<Quote> {
        let (b, q) = self.endpoints(base, quote, amount)?;
        let labels = self.bellman_ford(TradeSide::Sell, b, amount)?;
        self.finish(&labels, b, q, amount)
    }

    /// Minimum quote required to acquire `amount` of `base`.
    pub fn best_buy_rate(&self, base: &str, quote: &str, amount: f64) -> RouteResult<Quote> {
        self.best_buy_rate_with(base, quote, amount, BuyStrategy::BellmanFord)
    }

    pub fn best_buy_rate_with(
        &self,
        base: &str,
        quote: &str,
        amount: f64,
        strategy: BuyStrategy,
    ) -> RouteResult<Quote> {
        let (b, q) = self.endpoints(base, quote, amount)?;
        let labels = match strategy {
            BuyStrategy::BellmanFord => self.bellman_ford(TradeSide::Buy, b, amount)?,
            BuyStrategy::UniformCost => {
                let labels = self.uniform_cost(b, amount);
                if labels.base_gained(b, amount) || self.can_improve(&labels) {
                    debug!("[ROUTE] uniform-cost labels not settled, falling back to bellman-ford");
                    self.bellman_ford(TradeSide::Buy, b, amount)?
                } else {
                    labels
                }
            }
        };
        self.finish(&labels, b, q, amount)
    }

    fn endpoints(&self, base: &str, quote: &str, amount: f64) -> RouteResult<(usize, usize)> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RouteError::InvalidInput(format!(
                "amount must be positive and finite, got {amount}"
            )));
        }
        let lookup = |token: &str| {
            self.index
                .get(token)
                .copied()
                .ok_or_else(|| RouteError::InvalidInput(format!("unknown token '{token}'")))
        };
        Ok((lookup(base)?, lookup(quote)?))
    }

    /// Bounded relaxation over `|V| - 1` rounds, then the arbitrage checks.
    fn bellman_ford(&self, side: TradeSide, base: usize, amount: f64) -> RouteResult<Labels> {
        let mut labels = Labels::new(side, self.tokens.len(), base, amount);
        let max_rounds = self.tokens.len().saturating_sub(1);
        let mut rounds = 0;
        while rounds < max_rounds {
            rounds += 1;
            if !self.relax_round(&mut labels) {
                break;
            }
        }
        debug!(%side, rounds, max_rounds, "[ROUTE] relaxation finished");

        if labels.base_gained(base, amount) || self.can_improve(&labels) {
            warn!(%side, base = %self.tokens[base], "[ROUTE] arbitrage loop detected");
            return Err(RouteError::ArbitrageLoop);
        }
        Ok(labels)
    }

    /// One pass over every edge leaving a reached vertex. Returns whether any
    /// label moved.
    fn relax_round(&self, labels: &mut Labels) -> bool {
        let mut changed = false;
        for (source, links) in self.adjacency.iter().enumerate() {
            for link in links {
                // a self-loop may have moved this label earlier in the pass
                if !labels.is_reached(source) {
                    continue;
                }
                let Some(candidate) = step(&link.edge, labels.side, labels.values[source]) else {
                    // not enough depth to fill, or the amount overflowed
                    continue;
                };
                if labels.improves(candidate, link.target) {
                    labels.values[link.target] = candidate;
                    labels.predecessors[link.target] = Some(source);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Whether one more pass would still move a label.
    fn can_improve(&self, labels: &Labels) -> bool {
        self.adjacency.iter().enumerate().any(|(source, links)| {
            labels.is_reached(source)
                && links.iter().any(|link| {
                    step(&link.edge, labels.side, labels.values[source])
                        .is_some_and(|candidate| labels.improves(candidate, link.target))
                })
        })
    }

    /// Uniform-cost expansion for the buy side; each vertex is settled once.
    fn uniform_cost(&self, base: usize, amount: f64) -> Labels {
        let mut labels = Labels::new(TradeSide::Buy, self.tokens.len(), base, amount);
        let mut settled = vec![false; self.tokens.len()];
        let mut queue = PriceQueue::with_capacity(self.tokens.len());
        queue.push(base, amount);

        while let Some(entry) = queue.pop_min() {
            let source = entry.item;
            if settled[source] {
                continue;
            }
            settled[source] = true;
            let required = labels.values[source];

            for link in &self.adjacency[source] {
                if settled[link.target] {
                    continue;
                }
                if let Some(candidate) = step(&link.edge, TradeSide::Buy, required) {
                    if labels.improves(candidate, link.target) {
                        labels.values[link.target] = candidate;
                        labels.predecessors[link.target] = Some(source);
                        queue.push(link.target, candidate);
                    }
                }
            }
        }
        debug!(
            settled = settled.iter().filter(|s| **s).count(),
            "[ROUTE] uniform-cost expansion finished"
        );
        labels
    }

    fn finish(&self, labels: &Labels, base: usize, quote: usize, amount: f64) -> RouteResult<Quote> {
        if !labels.is_reached(quote) {
            return Err(RouteError::NoRoute);
        }
        let Some(route) = path::reconstruct(&labels.predecessors, base, quote) else {
            warn!(
                base = %self.tokens[base],
                quote = %self.tokens[quote],
                "[ROUTE] predecessor chain does not reach base"
            );
            return Err(RouteError::NoRoute);
        };
        let total = labels.values[quote];
        Ok(Quote {
            rate: total / amount,
            total,
            path: route.into_iter().map(|i| self.tokens[i].clone()).collect(),
        })
    }
}

/// Simulate one hop. A result that is not finite counts as infeasible.
fn step(edge: &Edge, side: TradeSide, amount: f64) -> Option<f64> {
    edge.simulate(side, amount).filter(|value| value.is_finite())
}
