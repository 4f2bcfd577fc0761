//! Test fixtures for route-optimizer.
//!
//! Provides:
//! - Real Las Vegas / Henderson places with street addresses
//! - In-process fakes for the geocoder, matrix provider and solver
#![allow(dead_code)]

pub mod fakes;
pub mod las_vegas_locations;

pub use fakes::*;
pub use las_vegas_locations::*;
