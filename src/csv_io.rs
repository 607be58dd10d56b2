//! CSV ingestion of stops and export of planned routes.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::report::RoutePlan;
use crate::stop::Stop;

#[derive(Debug, Deserialize)]
struct StopRow {
    representative: String,
    store_name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
}

#[derive(Debug, Serialize)]
struct RouteRow<'a> {
    sequence: usize,
    zone: &'a str,
    store_name: &'a str,
    address: &'a str,
    city: &'a str,
    lat: f64,
    lon: f64,
    recurring: bool,
    travel_minutes: f64,
    travel_km: f64,
    maps_url: &'a str,
}

/// Stops read from a CSV, plus the number of rows skipped for missing or
/// unparseable coordinates.
#[derive(Debug, Default)]
pub struct StopsFile {
    pub stops: Vec<Stop>,
    pub missing_coordinates: usize,
}

pub fn read_stops(path: &Path) -> Result<StopsFile> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    read_stops_from(file).with_context(|| format!("cannot read {}", path.display()))
}

/// Expects headers `representative,store_name,address,city,lat,lon`.
pub fn read_stops_from<R: Read>(input: R) -> Result<StopsFile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut file = StopsFile::default();
    for (line, row) in reader.deserialize::<StopRow>().enumerate() {
        let row = row.with_context(|| format!("bad row on line {}", line + 2))?;
        match (row.lat, row.lon) {
            (Some(lat), Some(lon)) => file.stops.push(Stop {
                representative: row.representative,
                name: row.store_name,
                address: row.address.unwrap_or_default(),
                city: row.city.filter(|city| !city.is_empty()),
                lat,
                lng: lon,
            }),
            _ => file.missing_coordinates += 1,
        }
    }

    Ok(file)
}

/// `Route_<representative>.csv` inside `dir`.
pub fn route_path(dir: &Path, representative: &str) -> PathBuf {
    dir.join(format!("Route_{}.csv", sanitize(representative)))
}

pub fn write_route(dir: &Path, plan: &RoutePlan) -> Result<PathBuf> {
    let path = route_path(dir, &plan.representative);
    let file = File::create(&path).with_context(|| format!("cannot create {}", path.display()))?;
    write_route_to(file, plan).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(path)
}

pub fn write_route_to<W: Write>(output: W, plan: &RoutePlan) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);

    for visit in &plan.visits {
        writer.serialize(RouteRow {
            sequence: visit.sequence,
            zone: visit.zone.as_deref().unwrap_or(""),
            store_name: &visit.stop.name,
            address: &visit.stop.address,
            city: visit.stop.city.as_deref().unwrap_or(""),
            lat: visit.stop.lat,
            lon: visit.stop.lng,
            recurring: visit.recurring,
            travel_minutes: visit.travel_minutes,
            travel_km: visit.travel_km,
            maps_url: &visit.maps_url,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// File-name safe form of a representative name.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            c => c,
        })
        .collect()
}
