//! Request-scoped data model.
//!
//! Everything here lives for a single optimization request. The only stable
//! identity of an address is its `original_index`; all later stages join back
//! to the caller's rows through it.

use serde::{Deserialize, Serialize};

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate only when it lies within WGS84 bounds.
    pub fn checked(lat: f64, lng: f64) -> Option<Self> {
        let coordinate = Self::new(lat, lng);
        coordinate.is_valid().then_some(coordinate)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// One row of the uploaded address list.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressRecord {
    /// Position in the uploaded list.
    pub original_index: usize,
    pub name: String,
    pub address_text: String,
    /// Filled by the geocoder; a record that already carries one is not
    /// geocoded again.
    pub coordinate: Option<Coordinate>,
}

impl AddressRecord {
    pub fn new(original_index: usize, name: impl Into<String>, address_text: impl Into<String>) -> Self {
        Self {
            original_index,
            name: name.into(),
            address_text: address_text.into(),
            coordinate: None,
        }
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }
}

/// How one end of the route is constrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Endpoint {
    #[default]
    None,
    /// Anchor on the first input address. No synthetic node is inserted.
    FirstInputPoint,
    /// A free-text address resolved independently of the uploaded list.
    CustomAddress(String),
}

impl Endpoint {
    /// The address to resolve, if this endpoint needs a synthetic node.
    ///
    /// A blank custom address counts as unset.
    pub fn custom_address(&self) -> Option<&str> {
        match self {
            Endpoint::CustomAddress(text) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Everything needed to optimize one uploaded list.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub addresses: Vec<AddressRecord>,
    pub start: Endpoint,
    pub end: Endpoint,
}

impl RouteRequest {
    pub fn new(addresses: Vec<AddressRecord>) -> Self {
        Self {
            addresses,
            start: Endpoint::None,
            end: Endpoint::None,
        }
    }

    pub fn start(mut self, start: Endpoint) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: Endpoint) -> Self {
        self.end = end;
        self
    }
}

/// One line of the optimized route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRow {
    pub original_index: usize,
    pub name: String,
    #[serde(rename = "address")]
    pub address_text: String,
}

/// Outcome of a successful optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    /// Rows in visiting order, synthetic endpoints excluded.
    pub rows: Vec<RouteRow>,
    /// Closed-tour cost reported by the solver, in provider units.
    pub cost: f64,
    /// `original_index` of every address that could not be geocoded.
    pub failed: Vec<usize>,
    /// Whether a custom start node actually took part in the solve.
    pub start_applied: bool,
    /// Whether a custom end node actually took part in the solve.
    pub end_applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(Coordinate::checked(36.1, -115.1).is_some());
        assert!(Coordinate::checked(91.0, 0.0).is_none());
        assert!(Coordinate::checked(0.0, -180.5).is_none());
        assert!(Coordinate::checked(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn blank_custom_endpoint_is_unset() {
        assert_eq!(Endpoint::CustomAddress("  ".into()).custom_address(), None);
        assert_eq!(Endpoint::FirstInputPoint.custom_address(), None);
        assert_eq!(
            Endpoint::CustomAddress("Depot".into()).custom_address(),
            Some("Depot")
        );
    }
}
