//! Stops and the occurrences of stops that make up a working set.

use crate::error::PlanError;

/// A geolocated store to visit.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub representative: String,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl Stop {
    pub fn new(
        representative: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            representative: representative.into(),
            name: name.into(),
            address: address.into(),
            city: None,
            lat,
            lng,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Location as `(lat, lng)`.
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Rejects coordinates that would poison a travel matrix.
    pub fn validate(&self) -> Result<(), PlanError> {
        let reason = if !self.lat.is_finite() || !self.lng.is_finite() {
            Some("coordinate is not a number")
        } else if !(-90.0..=90.0).contains(&self.lat) {
            Some("latitude out of range")
        } else if !(-180.0..=180.0).contains(&self.lng) {
            Some("longitude out of range")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(PlanError::MalformedStop {
                name: self.name.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// One visit of a stop inside a working set.
///
/// A recurring stop has two occurrences sharing the same [`Stop`]; both carry
/// `recurring`, only the injected one carries `duplicate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub stop: Stop,
    /// Canonical zone index (0-based), when zones were assigned.
    pub zone: Option<usize>,
    /// Block group id in block-grouping mode.
    pub group: Option<usize>,
    pub recurring: bool,
    pub duplicate: bool,
}

impl Occurrence {
    pub fn new(stop: Stop) -> Self {
        Self {
            stop,
            zone: None,
            group: None,
            recurring: false,
            duplicate: false,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        self.stop.location()
    }
}

/// Display label for a 0-based zone index.
pub fn zone_label(zone: usize) -> String {
    format!("Zone {}", zone + 1)
}
