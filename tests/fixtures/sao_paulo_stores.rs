//! Store locations around Sao Paulo for pipeline fixtures.
//!
//! Coordinates are approximate neighbourhood centres, spread so that four
//! weekly zones separate cleanly.

use visit_planner::Stop;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// North (Santana / Tucuruvi)
// ============================================================================

pub const NORTH: &[Location] = &[
    Location::new("Mercado Santana", -23.4985, -46.6254),
    Location::new("Farma Tucuruvi", -23.4801, -46.6035),
    Location::new("Loja Jacana", -23.4650, -46.5830),
    Location::new("Emporio Mandaqui", -23.4862, -46.6380),
];

// ============================================================================
// Centre (Se / Republica)
// ============================================================================

pub const CENTRE: &[Location] = &[
    Location::new("Loja Se", -23.5505, -46.6333),
    Location::new("Mercado Republica", -23.5432, -46.6422),
    Location::new("Farma Liberdade", -23.5586, -46.6351),
    Location::new("Emporio Bela Vista", -23.5614, -46.6490),
];

// ============================================================================
// South (Santo Amaro / Interlagos)
// ============================================================================

pub const SOUTH: &[Location] = &[
    Location::new("Loja Santo Amaro", -23.6545, -46.7100),
    Location::new("Mercado Interlagos", -23.6801, -46.6780),
    Location::new("Farma Socorro", -23.6705, -46.6990),
    Location::new("Emporio Campo Grande", -23.6650, -46.6850),
];

// ============================================================================
// Far south (Grajau / Parelheiros)
// ============================================================================

pub const FAR_SOUTH: &[Location] = &[
    Location::new("Loja Grajau", -23.7650, -46.6960),
    Location::new("Mercado Parelheiros", -23.8270, -46.7270),
    Location::new("Farma Varginha", -23.7900, -46.7100),
    Location::new("Emporio Cocaia", -23.7800, -46.6700),
];

/// Every fixture location, north to south.
pub fn all_locations() -> Vec<Location> {
    NORTH
        .iter()
        .chain(CENTRE)
        .chain(SOUTH)
        .chain(FAR_SOUTH)
        .cloned()
        .collect()
}

/// Stops for one representative built from locations.
pub fn stops_for(representative: &str, locations: &[Location]) -> Vec<Stop> {
    locations
        .iter()
        .map(|location| {
            Stop::new(
                representative,
                location.name,
                format!("{}, Sao Paulo", location.name),
                location.lat,
                location.lng,
            )
            .with_city("Sao Paulo")
        })
        .collect()
}
