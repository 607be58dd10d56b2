//! Second visits for mid-sized stop sets.
//!
//! A seeded sample of stops is duplicated into a zone a fixed number of
//! positions away, so the second visit lands in a different week.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::stop::Occurrence;

#[derive(Debug, Clone)]
pub struct RecurrencePolicy {
    /// Stop counts (inclusive) that get second visits.
    pub eligible: RangeInclusive<usize>,
    /// Upper bound on duplicated stops.
    pub quota: usize,
    /// Zones between the original visit and its duplicate.
    pub zone_shift: usize,
    pub seed: u64,
}

impl Default for RecurrencePolicy {
    fn default() -> Self {
        Self {
            eligible: 10..=30,
            quota: 10,
            zone_shift: 2,
            seed: 42,
        }
    }
}

impl RecurrencePolicy {
    pub fn applies_to(&self, stop_count: usize) -> bool {
        self.eligible.contains(&stop_count)
    }
}

/// Appends duplicates for a sampled quota of occurrences.
///
/// Every input occurrence must carry a zone below `zone_count`. Outside the
/// eligible band the input is returned untouched.
pub fn inject(
    mut occurrences: Vec<Occurrence>,
    zone_count: usize,
    policy: &RecurrencePolicy,
) -> Vec<Occurrence> {
    let n = occurrences.len();
    if !policy.applies_to(n) {
        return occurrences;
    }

    if zone_count == 0 || policy.zone_shift % zone_count == 0 {
        warn!(
            zone_count,
            zone_shift = policy.zone_shift,
            "zone shift maps back onto the same zone, skipping second visits"
        );
        return occurrences;
    }

    let quota = n.min(policy.quota);
    let mut rng = ChaCha8Rng::seed_from_u64(policy.seed);
    let mut picked = index::sample(&mut rng, n, quota).into_vec();
    picked.sort_unstable();

    let mut duplicates = Vec::with_capacity(quota);
    for row in &picked {
        let original = &occurrences[*row];
        let Some(zone) = original.zone else {
            warn!(stop = %original.stop.name, "stop has no zone, cannot schedule a second visit");
            continue;
        };

        let mut duplicate = original.clone();
        duplicate.zone = Some((zone + policy.zone_shift) % zone_count);
        duplicate.recurring = true;
        duplicate.duplicate = true;
        duplicates.push(duplicate);
    }

    let recurring: HashSet<String> = duplicates.iter().map(|o| o.stop.name.clone()).collect();
    for occurrence in occurrences.iter_mut() {
        if recurring.contains(&occurrence.stop.name) {
            occurrence.recurring = true;
        }
    }

    debug!(stops = n, duplicates = duplicates.len(), "injected second visits");
    occurrences.extend(duplicates);
    occurrences
}
