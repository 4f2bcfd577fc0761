//! route-optimizer core
//!
//! Turns a list of named addresses into an efficient visiting order: geocode,
//! fetch a distance matrix, run a tour heuristic, then map the tour back onto
//! the caller's rows.

pub mod builder;
pub mod config;
pub mod error;
pub mod geocode;
pub mod haversine;
pub mod matrix;
pub mod model;
pub mod ors;
pub mod osrm;
pub mod solver;
pub mod table;
pub mod traits;
