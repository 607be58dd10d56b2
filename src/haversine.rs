//! Haversine travel estimator (fallback when OSRM unavailable).
//!
//! Uses great-circle distance inflated by a road-curvature factor.
//! Less accurate than OSRM (ignores roads) but always available.

use crate::traits::GeometricEstimator;

/// Straight line to road distance.
const DEFAULT_ROAD_FACTOR: f64 = 1.3;

/// Urban driving speed, roughly 40 km/h.
const DEFAULT_SPEED_MPS: f64 = 11.0;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine-based travel estimator.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Multiplier applied to the great-circle distance.
    pub road_factor: f64,
    /// Assumed average driving speed in m/s.
    pub speed_mps: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            road_factor: DEFAULT_ROAD_FACTOR,
            speed_mps: DEFAULT_SPEED_MPS,
        }
    }
}

impl HaversineMatrix {
    pub fn new(road_factor: f64, speed_mps: f64) -> Self {
        Self {
            road_factor,
            speed_mps,
        }
    }

    /// Great-circle distance between two points in meters.
    pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl GeometricEstimator for HaversineMatrix {
    fn name(&self) -> &'static str {
        "haversine"
    }

    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
        let meters = Self::haversine_m(from, to) * self.road_factor;
        (meters / self.speed_mps, meters)
    }
}
