//! Deterministic stand-ins for the external collaborators.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use route_optimizer::error::{GeocodeError, MatrixError};
use route_optimizer::matrix::DistanceMatrix;
use route_optimizer::model::Coordinate;
use route_optimizer::solver::Tour;
use route_optimizer::traits::{DistanceMatrixProvider, Geocoder, TourSolver};

use super::las_vegas_locations::Place;

/// Resolves only the addresses it was given; everything else is not found.
#[derive(Default)]
pub struct FixtureGeocoder {
    known: HashMap<String, Coordinate>,
    broken: Option<String>,
    calls: AtomicUsize,
}

impl FixtureGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.known.insert(address.to_string(), coordinate);
        self
    }

    pub fn with_places(mut self, places: &[Place]) -> Self {
        for place in places {
            self.known.insert(place.address.to_string(), place.coordinate());
        }
        self
    }

    /// Looking up `address` fails as if the service were down.
    pub fn broken_on(mut self, address: &str) -> Self {
        self.broken = Some(address.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for FixtureGeocoder {
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.as_deref() == Some(address) {
            return Err(GeocodeError::Status { status: 503 });
        }
        Ok(self.known.get(address).copied())
    }
}

/// Returns the same grid for any request and records what it was asked.
pub struct FixedMatrix {
    rows: Vec<Vec<f64>>,
    pub requests: Mutex<Vec<Vec<Coordinate>>>,
}

impl FixedMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self {
            rows,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `n`x`n` grid of ones with a zero diagonal.
    pub fn uniform(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
                .collect(),
        )
    }

    pub fn last_request(&self) -> Option<Vec<Coordinate>> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl DistanceMatrixProvider for FixedMatrix {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        self.requests.lock().unwrap().push(locations.to_vec());
        DistanceMatrix::from_rows(self.rows.clone())
    }
}

/// Always fails like an unreachable provider.
pub struct FailingMatrix;

impl DistanceMatrixProvider for FailingMatrix {
    fn matrix_for(&self, _locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        Err(MatrixError::Status {
            status: 502,
            message: "upstream unavailable".to_string(),
        })
    }
}

/// Returns a fixed permutation regardless of the matrix.
pub struct ScriptedSolver(pub Vec<usize>);

impl TourSolver for ScriptedSolver {
    fn solve(&self, _matrix: &DistanceMatrix) -> Tour {
        Tour::new(self.0.clone(), 1.0)
    }
}

/// Coordinates spaced along a meridian; handy for letter-named fakes.
pub fn point(i: usize) -> Coordinate {
    Coordinate::new(36.0 + i as f64 * 0.01, -115.0)
}
