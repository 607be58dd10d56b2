//! Travel matrices and the provider that degrades to a geometric estimate.

use tracing::{debug, warn};

use crate::traits::{DistanceMatrixProvider, GeometricEstimator};

/// Where a matrix came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixSource {
    /// Live road-network routing.
    Routed,
    /// Closed-form geometric estimate.
    Estimated,
}

/// Parallel duration (seconds) and distance (meters) matrices.
///
/// `[i][j]` is the cost from location `i` to location `j`, in the order the
/// locations were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrices {
    pub durations: Vec<Vec<f64>>,
    pub distances: Vec<Vec<f64>>,
    pub source: MatrixSource,
}

impl TravelMatrices {
    pub fn new(durations: Vec<Vec<f64>>, distances: Vec<Vec<f64>>, source: MatrixSource) -> Self {
        Self {
            durations,
            distances,
            source,
        }
    }

    pub fn empty(source: MatrixSource) -> Self {
        Self::new(Vec::new(), Vec::new(), source)
    }

    pub fn size(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn duration(&self, from: usize, to: usize) -> f64 {
        self.durations[from][to]
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from][to]
    }

    /// Checks shape and that every cell is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.durations.len();
        if self.distances.len() != n {
            return Err(format!(
                "durations has {} rows but distances has {}",
                n,
                self.distances.len()
            ));
        }

        for (label, table) in [("durations", &self.durations), ("distances", &self.distances)] {
            for (i, row) in table.iter().enumerate() {
                if row.len() != n {
                    return Err(format!("{} row {} is not {} wide", label, i, n));
                }
                if let Some(j) = row.iter().position(|v| !v.is_finite() || *v < 0.0) {
                    return Err(format!("{} [{}][{}] = {}", label, i, j, row[j]));
                }
            }
        }

        Ok(())
    }
}

/// Live routing first, geometric estimate on any failure.
///
/// Never fails: a missing, unreachable or misbehaving routing service only
/// changes [`TravelMatrices::source`].
pub struct GeoMatrixProvider {
    live: Option<Box<dyn DistanceMatrixProvider + Send + Sync>>,
    fallback: Box<dyn GeometricEstimator + Send + Sync>,
}

impl GeoMatrixProvider {
    pub fn new(
        live: Option<Box<dyn DistanceMatrixProvider + Send + Sync>>,
        fallback: Box<dyn GeometricEstimator + Send + Sync>,
    ) -> Self {
        Self { live, fallback }
    }

    /// Provider that never tries the network.
    pub fn estimate_only(fallback: Box<dyn GeometricEstimator + Send + Sync>) -> Self {
        Self::new(None, fallback)
    }

    pub fn matrices(&self, locations: &[(f64, f64)]) -> TravelMatrices {
        if let Some(live) = &self.live {
            match live.matrix_for(locations) {
                Ok(matrices) if matrices.size() == locations.len() => {
                    debug!(size = locations.len(), "using routed matrices");
                    return matrices;
                }
                Ok(matrices) => {
                    warn!(
                        expected = locations.len(),
                        got = matrices.size(),
                        estimator = self.fallback.name(),
                        "routing matrix has wrong size, falling back to estimate"
                    );
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        estimator = self.fallback.name(),
                        "routing service unavailable, falling back to estimate"
                    );
                }
            }
        }

        self.fallback.estimate(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;
    use crate::haversine::HaversineMatrix;

    struct Failing;

    impl DistanceMatrixProvider for Failing {
        fn matrix_for(&self, _locations: &[(f64, f64)]) -> Result<TravelMatrices, MatrixError> {
            Err(MatrixError::Malformed("down".to_string()))
        }
    }

    struct Fixed;

    impl DistanceMatrixProvider for Fixed {
        fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<TravelMatrices, MatrixError> {
            let n = locations.len();
            let mut durations = vec![vec![0.0; n]; n];
            for (i, row) in durations.iter_mut().enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    // Directional: i -> j differs from j -> i.
                    if i < j {
                        *cell = 10.0;
                    } else if i > j {
                        *cell = 20.0;
                    }
                }
            }
            Ok(TravelMatrices::new(durations.clone(), durations, MatrixSource::Routed))
        }
    }

    fn locations() -> Vec<(f64, f64)> {
        vec![(-23.55, -46.63), (-23.56, -46.65), (-23.54, -46.60)]
    }

    #[test]
    fn falls_back_when_live_fails() {
        let provider = GeoMatrixProvider::new(Some(Box::new(Failing)), Box::new(HaversineMatrix::default()));
        let matrices = provider.matrices(&locations());

        assert_eq!(matrices.source, MatrixSource::Estimated);
        assert_eq!(matrices.size(), 3);
        assert!(matrices.validate().is_ok());
    }

    #[test]
    fn keeps_asymmetric_live_matrix() {
        let provider = GeoMatrixProvider::new(Some(Box::new(Fixed)), Box::new(HaversineMatrix::default()));
        let matrices = provider.matrices(&locations());

        assert_eq!(matrices.source, MatrixSource::Routed);
        assert_eq!(matrices.duration(0, 1), 10.0);
        assert_eq!(matrices.duration(1, 0), 20.0);
    }

    #[test]
    fn validate_rejects_non_finite() {
        let matrices = TravelMatrices::new(
            vec![vec![0.0, f64::NAN], vec![1.0, 0.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            MatrixSource::Routed,
        );
        assert!(matrices.validate().is_err());
    }

    #[test]
    fn empty_input_gives_empty_matrix() {
        let provider = GeoMatrixProvider::estimate_only(Box::new(HaversineMatrix::default()));
        assert!(provider.matrices(&[]).is_empty());
    }
}
