//! OSRM HTTP adapter for distance matrices.

use serde::Deserialize;

use crate::error::MatrixError;
use crate::matrix::DistanceMatrix;
use crate::model::Coordinate;
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Road distances from an OSRM `table` service, in metres.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn table_url(&self, locations: &[Coordinate]) -> String {
        let coords = locations
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<DistanceMatrix, MatrixError> {
        if locations.len() < 2 {
            return Err(MatrixError::TooFewLocations {
                count: locations.len(),
            });
        }

        let response = self
            .client
            .get(self.table_url(locations))
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

        let table: OsrmTableResponse =
            serde_json::from_str(&body).map_err(|err| MatrixError::Decode(err.to_string()))?;
        decode_table(table, locations.len())
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
}

fn decode_table(table: OsrmTableResponse, expected: usize) -> Result<DistanceMatrix, MatrixError> {
    if table.code != "Ok" {
        return Err(MatrixError::Malformed(format!(
            "OSRM answered {}: {}",
            table.code,
            table.message.unwrap_or_default()
        )));
    }

    let rows = table
        .distances
        .ok_or_else(|| MatrixError::Malformed("response has no distances".to_string()))?;

    DistanceMatrix::from_nullable_rows(rows)?.ensure_len(expected)
}
