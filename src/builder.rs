//! Route builder: geocode, pin endpoints, solve, and map the tour back onto
//! the uploaded rows.
//!
//! Solver space is the coordinate sequence
//! `[start?] + [geocoded inputs, original relative order] + [end?]`.
//! Reconciliation walks the solver's permutation, drops the synthetic
//! endpoint indices wherever they landed, and translates every remaining
//! index through `valid_indices` to the caller's `original_index`.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::error::RouteError;
use crate::geocode::geocode_all;
use crate::model::{AddressRecord, Coordinate, Endpoint, RouteReport, RouteRequest, RouteRow};
use crate::solver::Tour;
use crate::traits::{DistanceMatrixProvider, Geocoder, TourSolver};

#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Upper bound on simultaneous geocoder calls.
    pub geocode_concurrency: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            geocode_concurrency: 4,
        }
    }
}

/// Successfully geocoded inputs, in original relative order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodedSet {
    pub coordinates: Vec<Coordinate>,
    /// `original_index` of each entry in `coordinates`.
    pub valid_indices: Vec<usize>,
    /// `original_index` of every record that did not resolve.
    pub failed: Vec<usize>,
}

/// Coordinate sequence handed to the matrix provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverInput {
    pub coordinates: Vec<Coordinate>,
    pub start_present: bool,
    pub end_present: bool,
}

impl SolverInput {
    /// Wraps the geocoded inputs with optional synthetic endpoints.
    pub fn new(inputs: &[Coordinate], start: Option<Coordinate>, end: Option<Coordinate>) -> Self {
        let mut coordinates = Vec::with_capacity(inputs.len() + 2);
        coordinates.extend(start);
        coordinates.extend_from_slice(inputs);
        coordinates.extend(end);
        Self {
            coordinates,
            start_present: start.is_some(),
            end_present: end.is_some(),
        }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Maps a solver permutation back to `original_index` values.
///
/// Indices inside `[start_offset, start_offset + valid_indices.len())` are
/// real inputs; the synthetic start and end, and anything else outside that
/// range, are dropped wherever the solver placed them. The result keeps the
/// permutation's order.
pub fn reconcile(
    permutation: &[usize],
    start_present: bool,
    end_present: bool,
    valid_indices: &[usize],
) -> Vec<usize> {
    let start_offset = usize::from(start_present);
    let end_offset = usize::from(end_present);
    // Bounded by `valid_indices` so an unchecked permutation cannot index past it.
    let input_end = (start_offset + valid_indices.len())
        .min(permutation.len().saturating_sub(end_offset));
    let input_range = start_offset..input_end;

    permutation
        .iter()
        .copied()
        .filter(|idx| input_range.contains(idx))
        .map(|idx| valid_indices[idx - start_offset])
        .collect()
}

/// Orchestrates one optimization request over borrowed collaborators.
pub struct RouteBuilder<'a, G: ?Sized, M: ?Sized, S: ?Sized> {
    geocoder: &'a G,
    matrix: &'a M,
    solver: &'a S,
    options: BuilderOptions,
}

impl<'a, G, M, S> RouteBuilder<'a, G, M, S>
where
    G: Geocoder + ?Sized,
    M: DistanceMatrixProvider + ?Sized,
    S: TourSolver + ?Sized,
{
    pub fn new(geocoder: &'a G, matrix: &'a M, solver: &'a S) -> Self {
        Self {
            geocoder,
            matrix,
            solver,
            options: BuilderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(&self, request: &RouteRequest) -> Result<RouteReport, RouteError> {
        let geocoded = self.geocode_stage(&request.addresses)?;

        let start = self.resolve_endpoint("start", &request.start)?;
        let end = self.resolve_endpoint("end", &request.end)?;
        let input = SolverInput::new(&geocoded.coordinates, start, end);
        debug!(
            locations = input.len(),
            start = input.start_present,
            end = input.end_present,
            "solver input ready"
        );

        let tour = self.solve_stage(&input)?;

        let ordered = reconcile(
            &tour.permutation,
            input.start_present,
            input.end_present,
            &geocoded.valid_indices,
        );
        let rows = assemble_rows(&request.addresses, &ordered);

        info!(
            routed = rows.len(),
            failed = geocoded.failed.len(),
            cost = tour.cost,
            "route built"
        );

        Ok(RouteReport {
            rows,
            cost: tour.cost,
            failed: geocoded.failed,
            start_applied: input.start_present,
            end_applied: input.end_present,
        })
    }

    /// Resolves every record that has no coordinate yet.
    ///
    /// Coordinates outside WGS84 bounds, supplied or resolved, count as
    /// failed addresses.
    pub fn geocode_stage(&self, records: &[AddressRecord]) -> Result<GeocodedSet, RouteError> {
        let pending: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.coordinate.is_none())
            .map(|(position, _)| position)
            .collect();
        let queries: Vec<&str> = pending
            .iter()
            .map(|&position| records[position].address_text.as_str())
            .collect();

        let resolved = geocode_all(self.geocoder, &queries, self.options.geocode_concurrency)?;

        let mut coordinates: Vec<Option<Coordinate>> =
            records.iter().map(|record| record.coordinate).collect();
        for (position, coordinate) in pending.into_iter().zip(resolved) {
            coordinates[position] = coordinate;
        }

        let mut set = GeocodedSet::default();
        for (record, coordinate) in records.iter().zip(coordinates) {
            match coordinate {
                Some(coordinate) if !coordinate.is_valid() => {
                    warn!(
                        index = record.original_index,
                        ?coordinate,
                        "coordinate out of range, leaving it out of the route"
                    );
                    set.failed.push(record.original_index);
                }
                Some(coordinate) => {
                    set.coordinates.push(coordinate);
                    set.valid_indices.push(record.original_index);
                }
                None => {
                    warn!(
                        index = record.original_index,
                        address = %record.address_text,
                        "address not found, leaving it out of the route"
                    );
                    set.failed.push(record.original_index);
                }
            }
        }

        Ok(set)
    }

    /// A custom endpoint that does not resolve is dropped without an error.
    fn resolve_endpoint(&self, label: &str, endpoint: &Endpoint) -> Result<Option<Coordinate>, RouteError> {
        let Some(address) = endpoint.custom_address() else {
            if *endpoint == Endpoint::FirstInputPoint {
                debug!(endpoint = label, "anchored on first input address");
            }
            return Ok(None);
        };

        match self.geocoder.resolve(address)? {
            Some(coordinate) => Ok(Some(coordinate)),
            None => {
                warn!(endpoint = label, address, "custom endpoint not found, constraint dropped");
                Ok(None)
            }
        }
    }

    fn solve_stage(&self, input: &SolverInput) -> Result<Tour, RouteError> {
        let n = input.len();
        if n < 2 {
            return Ok(Tour::identity(n));
        }

        let matrix = self.matrix.matrix_for(&input.coordinates)?.ensure_len(n)?;
        let tour = self.solver.solve(&matrix);

        if let Err(violation) = tour.validate(n) {
            error!(%violation, permutation = ?tour.permutation, "solver returned an invalid tour");
            return Err(violation.into());
        }

        Ok(tour)
    }
}

/// Looks each `original_index` up in the uploaded records.
fn assemble_rows(records: &[AddressRecord], ordered: &[usize]) -> Vec<RouteRow> {
    let by_index: HashMap<usize, &AddressRecord> = records
        .iter()
        .map(|record| (record.original_index, record))
        .collect();

    ordered
        .iter()
        .filter_map(|original_index| by_index.get(original_index).copied())
        .map(|record| RouteRow {
            original_index: record.original_index,
            name: record.name.clone(),
            address_text: record.address_text.clone(),
        })
        .collect()
}
