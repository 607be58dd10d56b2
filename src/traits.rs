//! Core seams of the planner.
//!
//! Matrix acquisition is split in two: a live provider that may fail, and a
//! geometric estimator that always answers. Locations are `(lat, lng)` pairs.

use crate::error::MatrixError;
use crate::matrix::{MatrixSource, TravelMatrices};

/// Provides a duration/distance matrix for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<TravelMatrices, MatrixError>;
}

/// Closed-form travel estimate between two points.
///
/// Implementations must be pure and total for finite coordinates.
pub trait GeometricEstimator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Estimated `(seconds, meters)` to travel from one point to another.
    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> (f64, f64);

    /// Full matrix built from [`GeometricEstimator::leg`]. Diagonal is zero.
    fn estimate(&self, locations: &[(f64, f64)]) -> TravelMatrices {
        let n = locations.len();
        let mut durations = vec![vec![0.0; n]; n];
        let mut distances = vec![vec![0.0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    let (seconds, meters) = self.leg(*from, *to);
                    durations[i][j] = seconds;
                    distances[i][j] = meters;
                }
            }
        }

        TravelMatrices::new(durations, distances, MatrixSource::Estimated)
    }
}
