//! OpenRouteService adapters: address search and distance matrix.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeocodeError, MatrixError};
use crate::matrix::DistanceMatrix;
use crate::model::Coordinate;
use crate::traits::{DistanceMatrixProvider, Geocoder};

pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_PROFILE: &str = "driving-car";

#[derive(Clone)]
pub struct OrsConfig {
    pub api_key: String,
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl OrsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout_secs: 10,
        }
    }
}

impl fmt::Debug for OrsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrsConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// One authenticated client serving both ORS endpoints.
#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

impl Geocoder for OrsClient {
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.url("/geocode/search"))
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("text", address),
                ("size", "1"),
            ])
            .send()
            .map_err(|err| GeocodeError::Transport(err.without_url()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GeocodeError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: GeocodeResponse = response
            .json()
            .map_err(|err| GeocodeError::Decode(err.without_url().to_string()))?;
        let coordinate = best_match(body);
        debug!(address, found = coordinate.is_some(), "geocoded");
        Ok(coordinate)
    }
}

impl DistanceMatrixProvider for OrsClient {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        if locations.len() < 2 {
            return Err(MatrixError::TooFewLocations {
                count: locations.len(),
            });
        }

        let request = MatrixRequest::new(locations);
        let response = self
            .client
            .post(self.url(&format!("/v2/matrix/{}", self.config.profile)))
            .header(reqwest::header::AUTHORIZATION, self.config.api_key.as_str())
            .json(&request)
            .send()
            .map_err(MatrixError::Transport)?;

        let status = response.status();
        let body = response.text().map_err(MatrixError::Transport)?;
        if !status.is_success() {
            return Err(MatrixError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: MatrixResponse =
            serde_json::from_str(&body).map_err(|err| MatrixError::Decode(err.to_string()))?;
        decode_matrix(parsed, locations.len())
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: `[lng, lat]`.
    coordinates: Vec<f64>,
}

fn best_match(response: GeocodeResponse) -> Option<Coordinate> {
    let feature = response.features.into_iter().next()?;
    match feature.geometry.coordinates.as_slice() {
        [lng, lat, ..] => Some(Coordinate::new(*lat, *lng)),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct MatrixRequest {
    locations: Vec<[f64; 2]>,
    metrics: [&'static str; 1],
    units: &'static str,
}

impl MatrixRequest {
    fn new(locations: &[Coordinate]) -> Self {
        Self {
            locations: locations.iter().map(|c| [c.lng, c.lat]).collect(),
            metrics: ["distance"],
            units: "km",
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
}

fn decode_matrix(response: MatrixResponse, expected: usize) -> Result<DistanceMatrix, MatrixError> {
    let rows = response
        .distances
        .ok_or_else(|| MatrixError::Malformed("response has no distances".to_string()))?;
    DistanceMatrix::from_nullable_rows(rows)?.ensure_len(expected)
}
