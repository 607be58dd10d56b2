//! Annotated route output and its summaries.

use std::collections::BTreeSet;

use crate::matrix::MatrixSource;
use crate::solver::Tour;
use crate::stop::Stop;

/// One row of the final route, in visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedVisit {
    /// 1-based position in the route.
    pub sequence: usize,
    pub stop: Stop,
    pub zone: Option<String>,
    pub recurring: bool,
    pub duplicate: bool,
    /// Travel from the previous stop, minutes rounded to one decimal.
    pub travel_minutes: f64,
    /// Travel from the previous stop, kilometers rounded to one decimal.
    pub travel_km: f64,
    pub maps_url: String,
}

/// The immutable result of one planning run for one representative.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub representative: String,
    pub visits: Vec<PlannedVisit>,
    pub tour: Tour,
    pub matrix_source: MatrixSource,
    /// Input rows dropped for malformed coordinates.
    pub rejected: usize,
    pub visit_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub visits: usize,
    pub distance_km: f64,
    pub travel_minutes: f64,
    pub in_store_hours: f64,
}

impl RouteSummary {
    fn from_visits<'a>(visits: impl Iterator<Item = &'a PlannedVisit>, visit_minutes: f64) -> Self {
        let mut summary = RouteSummary {
            visits: 0,
            distance_km: 0.0,
            travel_minutes: 0.0,
            in_store_hours: 0.0,
        };

        for visit in visits {
            summary.visits += 1;
            summary.distance_km += visit.travel_km;
            summary.travel_minutes += visit.travel_minutes;
        }

        summary.distance_km = round1(summary.distance_km);
        summary.travel_minutes = round1(summary.travel_minutes);
        summary.in_store_hours = round1(summary.visits as f64 * visit_minutes / 60.0);
        summary
    }
}

impl RoutePlan {
    pub fn summary(&self) -> RouteSummary {
        RouteSummary::from_visits(self.visits.iter(), self.visit_minutes)
    }

    /// Summary over the visits of one zone, e.g. a single week.
    pub fn zone_summary(&self, zone: &str) -> RouteSummary {
        RouteSummary::from_visits(self.visits_in_zone(zone).into_iter(), self.visit_minutes)
    }

    pub fn visits_in_zone(&self, zone: &str) -> Vec<&PlannedVisit> {
        self.visits
            .iter()
            .filter(|visit| visit.zone.as_deref() == Some(zone))
            .collect()
    }

    /// Zones a store is visited in, shortened and sorted: `"Z1, Z3"`.
    pub fn cycle_for(&self, stop_name: &str) -> String {
        let zones: BTreeSet<String> = self
            .visits
            .iter()
            .filter(|visit| visit.stop.name == stop_name)
            .filter_map(|visit| visit.zone.as_deref())
            .map(|zone| zone.replace("Zone ", "Z"))
            .collect();

        zones.into_iter().collect::<Vec<_>>().join(", ")
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn maps_url(base: &str, stop: &Stop) -> String {
    format!("{}{},{}", base, stop.lat, stop.lng)
}
