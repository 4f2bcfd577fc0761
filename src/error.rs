use thiserror::Error;

/// Failure talking to a geocoding service.
///
/// A query that simply has no match is not an error; geocoders return
/// `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed")]
    Transport(#[source] reqwest::Error),

    #[error("geocoder rejected the API key (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("geocoder returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode geocoder response: {0}")]
    Decode(String),

    #[error("failed to start geocoding workers: {0}")]
    WorkerPool(String),
}

impl GeocodeError {
    /// Whether retrying the same query may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GeocodeError::Transport(_) => true,
            GeocodeError::Status { status } => *status == 429 || *status >= 500,
            GeocodeError::Unauthorized { .. }
            | GeocodeError::Decode(_)
            | GeocodeError::WorkerPool(_) => false,
        }
    }
}

/// Failure obtaining a distance matrix.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("distance matrix needs at least 2 locations, got {count}")]
    TooFewLocations { count: usize },

    #[error("matrix request failed")]
    Transport(#[source] reqwest::Error),

    #[error("matrix provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode matrix response: {0}")]
    Decode(String),

    #[error("malformed distance matrix: {0}")]
    Malformed(String),
}

/// A tour that breaks the solver contract.
#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("tour has {actual} entries for {expected} locations")]
    WrongLength { expected: usize, actual: usize },

    #[error("tour index {index} is out of range for {len} locations")]
    OutOfRange { index: usize, len: usize },

    #[error("tour visits index {index} more than once")]
    Duplicate { index: usize },

    #[error("tour cost {cost} is not a finite non-negative number")]
    InvalidCost { cost: f64 },
}

/// Failure reading or writing a route table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("upload is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Invalid or missing process configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Request-level failure of a route optimization.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("geocoding failed")]
    Geocode(#[from] GeocodeError),

    #[error("error getting distance matrix")]
    Matrix(#[from] MatrixError),

    #[error("solver broke its contract")]
    SolverContract(#[from] SolverError),
}
