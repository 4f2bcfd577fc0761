//! Tour heuristics over a distance matrix.
//!
//! Every solver returns a closed tour that starts at node 0. Cost is the
//! length of the cycle, including the leg from the last node back to node 0.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::SolverError;
use crate::matrix::DistanceMatrix;
use crate::traits::TourSolver;

/// A visiting order and its total cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub permutation: Vec<usize>,
    pub cost: f64,
}

impl Tour {
    pub fn new(permutation: Vec<usize>, cost: f64) -> Self {
        Self { permutation, cost }
    }

    /// Identity order over `n` nodes with zero cost.
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).collect(), 0.0)
    }

    /// Checks that the permutation covers `0..n` exactly once and that the
    /// cost is usable.
    pub fn validate(&self, n: usize) -> Result<(), SolverError> {
        if self.permutation.len() != n {
            return Err(SolverError::WrongLength {
                expected: n,
                actual: self.permutation.len(),
            });
        }
        let mut seen = vec![false; n];
        for &index in &self.permutation {
            if index >= n {
                return Err(SolverError::OutOfRange { index, len: n });
            }
            if seen[index] {
                return Err(SolverError::Duplicate { index });
            }
            seen[index] = true;
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(SolverError::InvalidCost { cost: self.cost });
        }
        Ok(())
    }
}

/// Length of the closed cycle through `order`.
pub fn tour_cost(matrix: &DistanceMatrix, order: &[usize]) -> f64 {
    if order.len() < 2 {
        return 0.0;
    }
    let legs: f64 = order.windows(2).map(|w| matrix.get(w[0], w[1])).sum();
    legs + matrix.get(order[order.len() - 1], order[0])
}

/// Tours of up to 2 nodes need no search.
fn trivial(matrix: &DistanceMatrix) -> Option<Tour> {
    (matrix.len() <= 2).then(|| {
        let order: Vec<usize> = (0..matrix.len()).collect();
        let cost = tour_cost(matrix, &order);
        Tour::new(order, cost)
    })
}

// ============================================================================
// Construction
// ============================================================================

/// Greedy construction: always move to the closest unvisited node.
#[derive(Debug, Clone, Default)]
pub struct NearestNeighbor;

impl NearestNeighbor {
    fn order(matrix: &DistanceMatrix) -> Vec<usize> {
        let n = matrix.len();
        if n == 0 {
            return Vec::new();
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut current = 0;
        visited[0] = true;
        order.push(0);

        while order.len() < n {
            let mut best: Option<(usize, f64)> = None;
            for candidate in 0..n {
                if visited[candidate] {
                    continue;
                }
                let distance = matrix.get(current, candidate);
                // Strict comparison keeps the lowest index on ties.
                if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                    best = Some((candidate, distance));
                }
            }
            let Some((next, _)) = best else { break };
            visited[next] = true;
            order.push(next);
            current = next;
        }

        order
    }
}

impl TourSolver for NearestNeighbor {
    fn solve(&self, matrix: &DistanceMatrix) -> Tour {
        let order = Self::order(matrix);
        let cost = tour_cost(matrix, &order);
        Tour::new(order, cost)
    }
}

// ============================================================================
// Local Search
// ============================================================================

/// Nearest-neighbour construction improved by 2-opt and relocate moves.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    /// Maximum improvement rounds.
    pub max_iterations: usize,
}

impl Default for LocalSearch {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
        }
    }
}

impl TourSolver for LocalSearch {
    fn solve(&self, matrix: &DistanceMatrix) -> Tour {
        if let Some(tour) = trivial(matrix) {
            return tour;
        }

        let mut order = NearestNeighbor::order(matrix);
        let mut cost = tour_cost(matrix, &order);
        improve(matrix, &mut order, &mut cost, self.max_iterations);
        Tour::new(order, cost)
    }
}

/// Runs improvement rounds until none helps or `max_iterations` is reached.
fn improve(matrix: &DistanceMatrix, order: &mut Vec<usize>, cost: &mut f64, max_iterations: usize) {
    for _ in 0..max_iterations {
        let improved = two_opt_improve(matrix, order, cost) || relocate_improve(matrix, order, cost);
        if !improved {
            break;
        }
    }
}

/// Improvement threshold; ignores floating-point noise.
const EPSILON: f64 = 1e-9;

/// 2-opt: reverse a segment of the tour. Position 0 stays fixed.
///
/// Full recomputation keeps this correct for asymmetric matrices, where a
/// reversed segment is traversed in the other direction.
/// Returns true if an improvement was made.
fn two_opt_improve(matrix: &DistanceMatrix, order: &mut [usize], cost: &mut f64) -> bool {
    let n = order.len();
    if n < 4 {
        return false;
    }

    for i in 1..n - 1 {
        for j in i + 1..n {
            order[i..=j].reverse();
            let candidate = tour_cost(matrix, order);
            if candidate + EPSILON < *cost {
                *cost = candidate;
                return true;
            }
            order[i..=j].reverse();
        }
    }

    false
}

/// Relocate: move one node to another position. Position 0 stays fixed.
/// Returns true if an improvement was made.
fn relocate_improve(matrix: &DistanceMatrix, order: &mut Vec<usize>, cost: &mut f64) -> bool {
    let n = order.len();
    if n < 4 {
        return false;
    }

    for from in 1..n {
        for to in 1..n {
            if to == from {
                continue;
            }
            let node = order.remove(from);
            order.insert(to, node);
            let candidate = tour_cost(matrix, order);
            if candidate + EPSILON < *cost {
                *cost = candidate;
                return true;
            }
            let node = order.remove(to);
            order.insert(from, node);
        }
    }

    false
}

// ============================================================================
// Simulated Annealing
// ============================================================================

/// Randomised search with geometric cooling, restarted in parallel.
///
/// Each restart uses its own seed derived from `seed`, so results are
/// reproducible.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    pub seed: u64,
    /// Moves tried per restart.
    pub iterations: usize,
    /// Multiplier applied to the temperature after each move.
    pub cooling_rate: f64,
    pub restarts: usize,
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 20_000,
            cooling_rate: 0.9995,
            restarts: 4,
        }
    }
}

impl SimulatedAnnealing {
    fn anneal(&self, matrix: &DistanceMatrix, seed: u64) -> Tour {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = matrix.len();

        let mut current = NearestNeighbor::order(matrix);
        let mut current_cost = tour_cost(matrix, &current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        // Start hot enough to accept a move about as long as an average leg.
        let mut temperature = (current_cost / n as f64).max(EPSILON);

        for _ in 0..self.iterations {
            let i = rng.gen_range(1..n);
            let mut j = rng.gen_range(1..n);
            if i == j {
                j = if j + 1 < n { j + 1 } else { 1 };
            }
            if i == j {
                continue;
            }
            let (lo, hi) = (i.min(j), i.max(j));

            let swap = rng.gen_bool(0.5);
            if swap {
                current.swap(lo, hi);
            } else {
                current[lo..=hi].reverse();
            }

            let candidate_cost = tour_cost(matrix, &current);
            let delta = candidate_cost - current_cost;
            let accept = delta <= 0.0 || rng.gen_range(0.0..1.0) < (-delta / temperature).exp();

            if accept {
                current_cost = candidate_cost;
                if current_cost + EPSILON < best_cost {
                    best_cost = current_cost;
                    best.copy_from_slice(&current);
                }
            } else if swap {
                current.swap(lo, hi);
            } else {
                current[lo..=hi].reverse();
            }

            temperature = (temperature * self.cooling_rate).max(EPSILON);
        }

        Tour::new(best, best_cost)
    }
}

impl TourSolver for SimulatedAnnealing {
    fn solve(&self, matrix: &DistanceMatrix) -> Tour {
        if let Some(tour) = trivial(matrix) {
            return tour;
        }

        let restarts = self.restarts.max(1) as u64;
        (0..restarts)
            .into_par_iter()
            .map(|restart| (restart, self.anneal(matrix, self.seed.wrapping_add(restart))))
            // Ties go to the lower restart so the answer does not depend on scheduling.
            .min_by(|(ra, a), (rb, b)| a.cost.total_cmp(&b.cost).then(ra.cmp(rb)))
            .map(|(_, tour)| tour)
            .unwrap_or_else(|| Tour::identity(matrix.len()))
    }
}

// ============================================================================
// Strategy selection
// ============================================================================

/// Named solver strategies for configuration and the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SolverKind {
    NearestNeighbor,
    #[default]
    LocalSearch,
    SimulatedAnnealing,
}

impl SolverKind {
    pub fn build(self) -> Box<dyn TourSolver> {
        match self {
            SolverKind::NearestNeighbor => Box::new(NearestNeighbor),
            SolverKind::LocalSearch => Box::new(LocalSearch::default()),
            SolverKind::SimulatedAnnealing => Box::new(SimulatedAnnealing::default()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::NearestNeighbor => "nearest-neighbor",
            SolverKind::LocalSearch => "local-search",
            SolverKind::SimulatedAnnealing => "annealing",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest-neighbor" | "nn" => Ok(SolverKind::NearestNeighbor),
            "local-search" | "2opt" | "2-opt" => Ok(SolverKind::LocalSearch),
            "annealing" | "simulated-annealing" | "sa" => Ok(SolverKind::SimulatedAnnealing),
            other => Err(format!(
                "unknown solver '{}', expected nearest-neighbor, local-search or annealing",
                other
            )),
        }
    }
}
