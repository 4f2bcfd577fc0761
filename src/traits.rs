//! Collaborator seams for the route builder.
//!
//! Geocoding, distance lookup and tour search are all swappable. Concrete
//! adapters live in their own modules; tests plug in fakes.

use crate::error::{GeocodeError, MatrixError};
use crate::matrix::DistanceMatrix;
use crate::model::Coordinate;
use crate::solver::Tour;

/// Resolves free-text addresses to coordinates.
pub trait Geocoder: Send + Sync {
    /// Best match for `address`, or `None` when nothing matches.
    ///
    /// Errors are reserved for transport, auth and decode failures.
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        (**self).resolve(address)
    }
}

/// Provides a distance matrix for a set of locations.
///
/// The matrix is indexed by the provided location order and `m[i][j]` is the
/// directed distance from `i` to `j`.
pub trait DistanceMatrixProvider: Send + Sync {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError>;
}

/// Heuristic tour search over a distance matrix.
///
/// Implementations must return every index `0..n` exactly once. The route
/// builder checks this and rejects anything else.
pub trait TourSolver: Send + Sync {
    fn solve(&self, matrix: &DistanceMatrix) -> Tour;
}
