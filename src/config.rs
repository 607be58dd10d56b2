//! Planner configuration.

use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::warn;

use crate::haversine::HaversineMatrix;
use crate::matrix::GeoMatrixProvider;
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::planar::PlanarMatrix;
use crate::recurrence::RecurrencePolicy;
use crate::solver::SolveOptions;
use crate::traits::{DistanceMatrixProvider, GeometricEstimator};
use crate::zones::ClusterOptions;

/// Geometric estimator used when live routing is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatorKind {
    #[default]
    Haversine,
    Planar,
}

impl EstimatorKind {
    pub fn build(self) -> Box<dyn GeometricEstimator + Send + Sync> {
        match self {
            EstimatorKind::Haversine => Box::new(HaversineMatrix::default()),
            EstimatorKind::Planar => Box::new(PlanarMatrix::default()),
        }
    }
}

impl FromStr for EstimatorKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "haversine" => Ok(EstimatorKind::Haversine),
            "planar" => Ok(EstimatorKind::Planar),
            other => Err(format!("unknown estimator '{}', expected haversine or planar", other)),
        }
    }
}

/// How stops are grouped before sequencing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grouping {
    /// Monthly plan: labeled zones, one per week, with optional second visits.
    WeeklyZones { zone_count: usize },
    /// Precision sequencing: unlabeled blocks used only to pre-sort.
    Blocks { block_size: usize },
    /// Sort by latitude/longitude only.
    None,
}

impl Default for Grouping {
    fn default() -> Self {
        Grouping::WeeklyZones { zone_count: 4 }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Live routing service. `None` always uses the estimator.
    pub osrm: Option<OsrmConfig>,
    pub estimator: EstimatorKind,
    pub grouping: Grouping,
    /// Second visits, weekly zones only. `None` disables them.
    pub recurrence: Option<RecurrencePolicy>,
    pub cluster: ClusterOptions,
    pub solve: SolveOptions,
    /// Time spent inside each store, for the route summary.
    pub visit_minutes: f64,
    /// Prefix of the navigation link; `lat,lon` is appended.
    pub maps_url_base: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            osrm: None,
            estimator: EstimatorKind::default(),
            grouping: Grouping::default(),
            recurrence: Some(RecurrencePolicy::default()),
            cluster: ClusterOptions::default(),
            solve: SolveOptions::default(),
            visit_minutes: 45.0,
            maps_url_base: "https://www.google.com/maps/search/?api=1&query=".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("OSRM_URL").filter(|url| !url.is_empty()) {
            let mut osrm = OsrmConfig::new(url);
            if let Some(profile) = lookup("OSRM_PROFILE") {
                osrm.profile = profile;
            }
            if let Some(timeout) = lookup("OSRM_TIMEOUT_SECS") {
                osrm.timeout_secs = timeout
                    .parse()
                    .with_context(|| format!("OSRM_TIMEOUT_SECS is not a number: {}", timeout))?;
            }
            config.osrm = Some(osrm);
        }

        if let Some(estimator) = lookup("FALLBACK_ESTIMATOR") {
            config.estimator = estimator.parse().map_err(anyhow::Error::msg)?;
        }

        if let Some(zones) = lookup("ZONE_COUNT") {
            let zone_count = zones
                .parse()
                .with_context(|| format!("ZONE_COUNT is not a number: {}", zones))?;
            config.grouping = Grouping::WeeklyZones { zone_count };
        }

        if let Some(minutes) = lookup("VISIT_MINUTES") {
            config.visit_minutes = minutes
                .parse()
                .with_context(|| format!("VISIT_MINUTES is not a number: {}", minutes))?;
        }

        if let Some(base) = lookup("MAPS_URL_BASE") {
            config.maps_url_base = base;
        }

        Ok(config)
    }

    /// Matrix provider for this deployment. A client that cannot be built
    /// degrades to estimate-only.
    pub fn matrix_provider(&self) -> GeoMatrixProvider {
        let live = self.osrm.clone().and_then(|osrm| match OsrmClient::new(osrm) {
            Ok(client) => Some(Box::new(client) as Box<dyn DistanceMatrixProvider + Send + Sync>),
            Err(err) => {
                warn!(error = %err, "cannot build OSRM client, using estimates only");
                None
            }
        });

        GeoMatrixProvider::new(live, self.estimator.build())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = PlannerConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.osrm.is_none());
        assert_eq!(config.estimator, EstimatorKind::Haversine);
        assert_eq!(config.grouping, Grouping::WeeklyZones { zone_count: 4 });
        assert_eq!(config.visit_minutes, 45.0);
    }

    #[test]
    fn reads_osrm_and_estimator() {
        let config = PlannerConfig::from_lookup(lookup(&[
            ("OSRM_URL", "http://osrm:5000"),
            ("OSRM_TIMEOUT_SECS", "3"),
            ("FALLBACK_ESTIMATOR", "Planar"),
            ("ZONE_COUNT", "5"),
        ]))
        .unwrap();

        let osrm = config.osrm.unwrap();
        assert_eq!(osrm.base_url, "http://osrm:5000");
        assert_eq!(osrm.profile, "driving");
        assert_eq!(osrm.timeout_secs, 3);
        assert_eq!(config.estimator, EstimatorKind::Planar);
        assert_eq!(config.grouping, Grouping::WeeklyZones { zone_count: 5 });
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(PlannerConfig::from_lookup(lookup(&[("ZONE_COUNT", "four")])).is_err());
        assert!(PlannerConfig::from_lookup(lookup(&[("FALLBACK_ESTIMATOR", "euclid")])).is_err());
    }
}
