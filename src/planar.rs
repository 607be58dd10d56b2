//! Planar degree-based travel estimator.
//!
//! Treats one degree of latitude or longitude as a fixed number of meters.
//! Cruder than haversine at high latitudes, cheap everywhere.

use crate::traits::GeometricEstimator;

/// Meters per degree at the equator.
const DEFAULT_METERS_PER_DEGREE: f64 = 111_320.0;

/// Roughly 47 km/h.
const DEFAULT_SPEED_MPS: f64 = 13.0;

#[derive(Debug, Clone)]
pub struct PlanarMatrix {
    pub meters_per_degree: f64,
    pub speed_mps: f64,
}

impl Default for PlanarMatrix {
    fn default() -> Self {
        Self {
            meters_per_degree: DEFAULT_METERS_PER_DEGREE,
            speed_mps: DEFAULT_SPEED_MPS,
        }
    }
}

impl PlanarMatrix {
    pub fn new(meters_per_degree: f64, speed_mps: f64) -> Self {
        Self {
            meters_per_degree,
            speed_mps,
        }
    }
}

impl GeometricEstimator for PlanarMatrix {
    fn name(&self) -> &'static str {
        "planar"
    }

    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
        let delta_lat = to.0 - from.0;
        let delta_lng = to.1 - from.1;
        let meters = delta_lat.hypot(delta_lng) * self.meters_per_degree;
        (meters / self.speed_mps, meters)
    }
}
