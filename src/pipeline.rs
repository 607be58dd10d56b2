//! Planning pipeline: filter, group, recur, sort, sequence, annotate.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{Grouping, PlannerConfig};
use crate::error::PlanError;
use crate::matrix::GeoMatrixProvider;
use crate::recurrence;
use crate::report::{PlannedVisit, RoutePlan, maps_url, round1};
use crate::solver;
use crate::stop::{Occurrence, Stop, zone_label};
use crate::zones::ZoneAssigner;

/// Result of a run that did not fail.
#[derive(Debug, Clone)]
pub enum PlanOutcome {
    /// No stop with valid coordinates belongs to the representative.
    Empty { rejected: usize },
    Planned(RoutePlan),
}

impl PlanOutcome {
    pub fn route(&self) -> Option<&RoutePlan> {
        match self {
            PlanOutcome::Planned(plan) => Some(plan),
            PlanOutcome::Empty { .. } => None,
        }
    }
}

pub struct Planner {
    config: PlannerConfig,
    matrices: GeoMatrixProvider,
    zones: ZoneAssigner,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        let matrices = config.matrix_provider();
        Self::with_matrix_provider(config, matrices)
    }

    pub fn with_matrix_provider(config: PlannerConfig, matrices: GeoMatrixProvider) -> Self {
        let zones = ZoneAssigner::new(config.cluster.clone());
        Self {
            config,
            matrices,
            zones,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans every representative found in `stops`, in order of first
    /// appearance. Representatives share nothing, so they run in parallel.
    pub fn plan_all(&self, stops: &[Stop]) -> Vec<(String, Result<PlanOutcome, PlanError>)> {
        let mut representatives: Vec<&str> = Vec::new();
        for stop in stops {
            if !representatives.contains(&stop.representative.as_str()) {
                representatives.push(&stop.representative);
            }
        }

        representatives
            .par_iter()
            .map(|representative| {
                (representative.to_string(), self.plan(representative, stops))
            })
            .collect()
    }

    /// Plans the stops belonging to one representative.
    pub fn plan(&self, representative: &str, stops: &[Stop]) -> Result<PlanOutcome, PlanError> {
        let (valid, rejected) = filter_stops(representative, stops);
        if valid.is_empty() {
            info!(representative, rejected, "nothing to plan");
            return Ok(PlanOutcome::Empty { rejected });
        }

        let mut working = valid.into_iter().map(Occurrence::new).collect::<Vec<_>>();
        let zone_count = self.group(&mut working)?;

        if let (Some(zone_count), Some(policy)) = (zone_count, &self.config.recurrence) {
            working = recurrence::inject(working, zone_count, policy);
        }

        working.sort_by(compare_occurrences);

        let locations: Vec<(f64, f64)> = working.iter().map(Occurrence::location).collect();
        let matrices = self.matrices.matrices(&locations);
        let tour = solver::sequence(&matrices, &self.config.solve)?;

        if tour.is_empty() || tour.len() != working.len() {
            return Err(PlanError::NoSolutionFound(format!(
                "tour covers {} of {} stops",
                tour.len(),
                working.len()
            )));
        }

        let visits = tour
            .order
            .iter()
            .enumerate()
            .map(|(position, row)| {
                let occurrence = &working[*row];
                PlannedVisit {
                    sequence: position + 1,
                    stop: occurrence.stop.clone(),
                    zone: occurrence.zone.map(zone_label),
                    recurring: occurrence.recurring,
                    duplicate: occurrence.duplicate,
                    travel_minutes: round1(tour.hop_durations[position] / 60.0),
                    travel_km: round1(tour.hop_distances[position] / 1000.0),
                    maps_url: maps_url(&self.config.maps_url_base, &occurrence.stop),
                }
            })
            .collect();

        let plan = RoutePlan {
            representative: representative.to_string(),
            visits,
            tour,
            matrix_source: matrices.source,
            rejected,
            visit_minutes: self.config.visit_minutes,
        };

        let summary = plan.summary();
        info!(
            representative,
            visits = summary.visits,
            distance_km = summary.distance_km,
            travel_minutes = summary.travel_minutes,
            source = ?plan.matrix_source,
            "route planned"
        );

        Ok(PlanOutcome::Planned(plan))
    }

    /// Annotates the working set with zones or blocks. Returns the zone count
    /// when weekly zones were assigned.
    fn group(&self, working: &mut [Occurrence]) -> Result<Option<usize>, PlanError> {
        let locations: Vec<(f64, f64)> = working.iter().map(Occurrence::location).collect();

        match self.config.grouping {
            Grouping::WeeklyZones { zone_count } => {
                let assignment = self.zones.assign_zones(&locations, zone_count)?;
                for (occurrence, zone) in working.iter_mut().zip(assignment.zones) {
                    occurrence.zone = Some(zone);
                }
                Ok(Some(assignment.zone_count))
            }
            Grouping::Blocks { block_size } => {
                let groups = self.zones.block_groups(&locations, block_size)?;
                for (occurrence, group) in working.iter_mut().zip(groups) {
                    occurrence.group = Some(group);
                }
                Ok(None)
            }
            Grouping::None => Ok(None),
        }
    }
}

/// Stops of `representative` with usable coordinates, plus the number of
/// rows rejected as malformed.
fn filter_stops(representative: &str, stops: &[Stop]) -> (Vec<Stop>, usize) {
    let mut valid = Vec::new();
    let mut rejected = 0;

    for stop in stops.iter().filter(|stop| stop.representative == representative) {
        match stop.validate() {
            Ok(()) => valid.push(stop.clone()),
            Err(err) => {
                warn!(representative, error = %err, "skipping stop");
                rejected += 1;
            }
        }
    }

    (valid, rejected)
}

/// Zone (or block), then latitude, then longitude. Used with a stable sort.
fn compare_occurrences(a: &Occurrence, b: &Occurrence) -> Ordering {
    a.zone
        .cmp(&b.zone)
        .then(a.group.cmp(&b.group))
        .then(a.stop.lat.total_cmp(&b.stop.lat))
        .then(a.stop.lng.total_cmp(&b.stop.lng))
}
