//! Core library for the route-finder project.
//!
//! The `route` module is the pricing engine; the remaining modules load a
//! market description, configure a run and render its results.

pub mod config;
pub mod errors;
pub mod market;
pub mod models;
pub mod report;
pub mod route;
pub mod utils;
