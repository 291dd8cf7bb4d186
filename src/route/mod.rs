//! Routing engine: edges, the token graph and its price searches.

pub mod depth;
pub mod edge;
pub mod flat;
pub mod graph;
pub mod path;
pub mod queue;

pub use depth::DepthEdge;
pub use edge::{Conversion, Edge};
pub use flat::FlatEdge;
pub use graph::{BuyStrategy, Graph};
pub use queue::PriceQueue;
