//! Haversine distance matrix provider (offline fallback).
//!
//! Straight-line great-circle distance in kilometres. Ignores roads, so it
//! underestimates real travel, but never fails and needs no credential.

use crate::error::MatrixError;
use crate::matrix::DistanceMatrix;
use crate::model::Coordinate;
use crate::traits::DistanceMatrixProvider;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based distance matrix provider.
///
/// `detour_factor` scales straight-line distance toward a rough road
/// distance; 1.0 leaves it untouched.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    pub detour_factor: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self { detour_factor: 1.0 }
    }
}

impl HaversineMatrix {
    pub fn new(detour_factor: f64) -> Self {
        Self { detour_factor }
    }

    /// Great-circle distance between two points in kilometers.
    pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lng - from.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        if locations.len() < 2 {
            return Err(MatrixError::TooFewLocations {
                count: locations.len(),
            });
        }

        let n = locations.len();
        let mut rows = vec![vec![0.0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    rows[i][j] = Self::haversine_km(*from, *to) * self.detour_factor;
                }
            }
        }

        DistanceMatrix::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinate::new(36.1, -115.1);
        let dist = HaversineMatrix::haversine_km(point, point);
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Las Vegas to Los Angeles is ~370 km
        let dist = HaversineMatrix::haversine_km(
            Coordinate::new(36.17, -115.14),
            Coordinate::new(34.05, -118.24),
        );
        assert!(dist > 350.0 && dist < 400.0, "LV to LA should be ~370km, got {}", dist);
    }

    #[test]
    fn test_matrix_diagonal_is_zero() {
        let locations = vec![
            Coordinate::new(36.1, -115.1),
            Coordinate::new(36.2, -115.2),
            Coordinate::new(36.3, -115.3),
        ];
        let matrix = HaversineMatrix::default().matrix_for(&locations).unwrap();

        for i in 0..locations.len() {
            assert_eq!(matrix.get(i, i), 0.0, "Diagonal should be zero");
        }
    }

    #[test]
    fn test_matrix_symmetric_and_scaled() {
        let locations = vec![Coordinate::new(36.1, -115.1), Coordinate::new(36.2, -115.2)];
        let plain = HaversineMatrix::default().matrix_for(&locations).unwrap();
        let scaled = HaversineMatrix::new(1.5).matrix_for(&locations).unwrap();

        assert_eq!(plain.get(0, 1), plain.get(1, 0));
        assert!((scaled.get(0, 1) - plain.get(0, 1) * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_location_rejected() {
        let err = HaversineMatrix::default()
            .matrix_for(&[Coordinate::new(36.1, -115.1)])
            .unwrap_err();
        assert!(matches!(err, MatrixError::TooFewLocations { count: 1 }));
    }
}
