//! Geographic grouping of stops.
//!
//! Both modes share one k-means primitive. Weekly zones are canonicalized by
//! centroid latitude so the same upload always yields the same "Zone 1".
//! Block groups are only used to pre-sort stops before sequencing.

use std::collections::HashSet;

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::PlanError;

#[derive(Debug, Clone)]
pub struct ClusterOptions {
    pub seed: u64,
    /// Independent k-means restarts; the best inertia wins.
    pub n_runs: usize,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            n_runs: 100,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

/// Canonical zone index (0-based) for every input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAssignment {
    pub zones: Vec<usize>,
    pub zone_count: usize,
}

impl ZoneAssignment {
    pub fn zone_of(&self, row: usize) -> usize {
        self.zones[row]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZoneAssigner {
    pub options: ClusterOptions,
}

impl ZoneAssigner {
    pub fn new(options: ClusterOptions) -> Self {
        Self { options }
    }

    /// Clusters stops into at most `zone_count` zones, numbered by ascending
    /// centroid latitude (ties by longitude).
    pub fn assign_zones(
        &self,
        locations: &[(f64, f64)],
        zone_count: usize,
    ) -> Result<ZoneAssignment, PlanError> {
        if locations.is_empty() {
            return Ok(ZoneAssignment {
                zones: Vec::new(),
                zone_count: 0,
            });
        }

        let k = zone_count.max(1).min(distinct_count(locations));
        let raw = self.cluster(locations, k)?;
        let zones = canonicalize(locations, &raw);
        let zone_count = zones.iter().copied().max().map_or(0, |max| max + 1);

        debug!(stops = locations.len(), zone_count, "assigned zones");
        Ok(ZoneAssignment { zones, zone_count })
    }

    /// Groups stops into `max(1, n / block_size)` blocks. Group ids carry no
    /// geographic meaning.
    pub fn block_groups(
        &self,
        locations: &[(f64, f64)],
        block_size: usize,
    ) -> Result<Vec<usize>, PlanError> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }

        let groups = (locations.len() / block_size.max(1)).max(1);
        let k = groups.min(distinct_count(locations));
        self.cluster(locations, k)
    }

    fn cluster(&self, locations: &[(f64, f64)], k: usize) -> Result<Vec<usize>, PlanError> {
        if k <= 1 {
            return Ok(vec![0; locations.len()]);
        }

        let records = Array2::from_shape_fn((locations.len(), 2), |(row, col)| {
            let (lat, lng) = locations[row];
            if col == 0 { lat } else { lng }
        });
        let dataset = DatasetBase::from(records);
        let rng = ChaCha8Rng::seed_from_u64(self.options.seed);

        let model = KMeans::params_with_rng(k, rng)
            .n_runs(self.options.n_runs)
            .max_n_iterations(self.options.max_iterations)
            .tolerance(self.options.tolerance)
            .fit(&dataset)
            .map_err(|err| PlanError::Clustering(err.to_string()))?;

        let labels: Array1<usize> = model.predict(dataset.records());
        Ok(labels.to_vec())
    }
}

/// k-means++ cannot seed more centers than there are distinct points.
fn distinct_count(locations: &[(f64, f64)]) -> usize {
    locations
        .iter()
        .map(|(lat, lng)| (lat.to_bits(), lng.to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// Relabels raw cluster ids by ascending centroid `(lat, lng)`. Empty raw
/// clusters are dropped so the output labels are dense.
fn canonicalize(locations: &[(f64, f64)], raw: &[usize]) -> Vec<usize> {
    let clusters = raw.iter().copied().max().map_or(0, |max| max + 1);
    let mut sums = vec![(0.0_f64, 0.0_f64, 0_usize); clusters];
    for (&(lat, lng), &label) in locations.iter().zip(raw) {
        let entry = &mut sums[label];
        entry.0 += lat;
        entry.1 += lng;
        entry.2 += 1;
    }

    let mut centroids: Vec<(usize, f64, f64)> = sums
        .iter()
        .enumerate()
        .filter(|(_, (_, _, count))| *count > 0)
        .map(|(label, (lat, lng, count))| (label, lat / *count as f64, lng / *count as f64))
        .collect();

    centroids.sort_by(|a, b| {
        a.1.total_cmp(&b.1)
            .then(a.2.total_cmp(&b.2))
            .then(a.0.cmp(&b.0))
    });

    let mut mapping = vec![0; clusters];
    for (zone, (label, _, _)) in centroids.iter().enumerate() {
        mapping[*label] = zone;
    }

    raw.iter().map(|label| mapping[*label]).collect()
}
