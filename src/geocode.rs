//! Retry/validation wrapper around any geocoder, plus batch resolution.

use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::GeocodeError;
use crate::model::Coordinate;
use crate::traits::Geocoder;

/// Bounded exponential backoff for transient geocoder failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// No sleeping between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Retries transient failures and drops coordinates outside WGS84 bounds.
#[derive(Debug, Clone)]
pub struct RetryingGeocoder<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: Geocoder> RetryingGeocoder<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Geocoder> Geocoder for RetryingGeocoder<G> {
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let mut retry = 0;
        loop {
            match self.inner.resolve(address) {
                Ok(Some(coordinate)) if !coordinate.is_valid() => {
                    warn!(address, ?coordinate, "geocoder returned out-of-range coordinate, ignoring");
                    return Ok(None);
                }
                Ok(found) => return Ok(found),
                Err(err) if err.is_transient() && retry < self.policy.max_retries => {
                    let delay = self.policy.backoff(retry);
                    debug!(address, retry, ?delay, error = ?err, "retrying geocode");
                    std::thread::sleep(delay);
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Resolves every query on a pool of at most `concurrency` threads.
///
/// Output position `i` holds the result for `queries[i]`, whatever order the
/// lookups complete in. Any error fails the whole batch.
pub fn geocode_all<G>(
    geocoder: &G,
    queries: &[&str],
    concurrency: usize,
) -> Result<Vec<Option<Coordinate>>, GeocodeError>
where
    G: Geocoder + ?Sized,
{
    if queries.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .build()
        .map_err(|err| GeocodeError::WorkerPool(err.to_string()))?;

    pool.install(|| {
        queries
            .par_iter()
            .map(|query| geocoder.resolve(query))
            .collect()
    })
}
