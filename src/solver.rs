//! Single-vehicle open tour sequencing.
//!
//! The depot is row 0 and there is no return leg. Construction extends the
//! path end with its cheapest arc; an optional 2-opt pass follows.

use tracing::debug;

use crate::error::PlanError;
use crate::matrix::TravelMatrices;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Maximum improving 2-opt moves after construction. 0 disables it.
    pub local_search_iterations: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            local_search_iterations: 100,
        }
    }
}

/// Visiting order over working-set rows plus per-hop costs.
///
/// `hop_durations[i]` / `hop_distances[i]` is the cost from `order[i - 1]`
/// to `order[i]`; element 0 is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub order: Vec<usize>,
    pub hop_durations: Vec<f64>,
    pub hop_distances: Vec<f64>,
}

impl Tour {
    pub fn total_duration(&self) -> f64 {
        self.hop_durations.iter().sum()
    }

    pub fn total_distance(&self) -> f64 {
        self.hop_distances.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Sequences every row of `matrices` into an open tour from row 0,
/// minimizing cumulative duration.
pub fn sequence(matrices: &TravelMatrices, options: &SolveOptions) -> Result<Tour, PlanError> {
    if matrices.is_empty() {
        return Err(PlanError::NoSolutionFound("empty working set".to_string()));
    }
    matrices.validate().map_err(PlanError::NoSolutionFound)?;

    let mut order = cheapest_arc(&matrices.durations);
    let constructed = path_cost(&order, &matrices.durations);

    local_search(&mut order, &matrices.durations, options);
    debug!(
        stops = order.len(),
        constructed,
        improved = path_cost(&order, &matrices.durations),
        "sequenced tour"
    );

    Ok(annotate(order, matrices))
}

/// Path-cheapest-arc: from the current path end, always take the cheapest
/// arc to an unvisited row. Ties go to the lowest row index.
fn cheapest_arc(durations: &[Vec<f64>]) -> Vec<usize> {
    let n = durations.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut current = 0;
    visited[0] = true;
    order.push(0);

    while order.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (next, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let cost = durations[current][next];
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((next, cost));
            }
        }

        // `order.len() < n` guarantees an unvisited row exists.
        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

fn path_cost(order: &[usize], durations: &[Vec<f64>]) -> f64 {
    order.windows(2).map(|pair| durations[pair[0]][pair[1]]).sum()
}

// ============================================================================
// Local Search
// ============================================================================

/// 2-opt: reverse a segment of the path to reduce travel time.
/// The depot at position 0 never moves. Returns true if an improvement was
/// made.
fn two_opt_improve(order: &mut [usize], durations: &[Vec<f64>]) -> bool {
    let n = order.len();
    if n < 3 {
        return false;
    }

    let current_cost = path_cost(order, durations);
    let mut candidate = order.to_vec();

    for i in 0..n - 1 {
        for j in i + 2..n {
            // Reverse segment [i+1..=j]
            candidate[i + 1..=j].reverse();
            let cost = path_cost(&candidate, durations);

            // Matrices may be directional, so compare whole paths.
            if cost + 1e-9 < current_cost {
                order[i + 1..=j].reverse();
                return true;
            }
            candidate[i + 1..=j].reverse();
        }
    }

    false
}

fn local_search(order: &mut [usize], durations: &[Vec<f64>], options: &SolveOptions) {
    for _ in 0..options.local_search_iterations {
        if !two_opt_improve(order, durations) {
            break;
        }
    }
}

fn annotate(order: Vec<usize>, matrices: &TravelMatrices) -> Tour {
    let mut hop_durations = Vec::with_capacity(order.len());
    let mut hop_distances = Vec::with_capacity(order.len());
    hop_durations.push(0.0);
    hop_distances.push(0.0);

    for pair in order.windows(2) {
        hop_durations.push(matrices.duration(pair[0], pair[1]));
        hop_distances.push(matrices.distance(pair[0], pair[1]));
    }

    Tour {
        order,
        hop_durations,
        hop_distances,
    }
}
