//! OSRM HTTP adapter for duration/distance matrices.

use serde::Deserialize;
use tracing::debug;

use crate::error::MatrixError;
use crate::matrix::{MatrixSource, TravelMatrices};
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn table_url(&self, locations: &[(f64, f64)]) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<TravelMatrices, MatrixError> {
        if locations.is_empty() {
            return Ok(TravelMatrices::empty(MatrixSource::Routed));
        }

        let url = self.table_url(locations);
        debug!(locations = locations.len(), "requesting OSRM table");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())?;

        body.into_matrices(locations.len())
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    fn into_matrices(self, expected: usize) -> Result<TravelMatrices, MatrixError> {
        if let Some(code) = self.code.as_deref() {
            if code != "Ok" {
                return Err(MatrixError::Malformed(format!("response code {}", code)));
            }
        }

        let durations = self
            .durations
            .ok_or_else(|| MatrixError::Malformed("missing durations".to_string()))?;
        let distances = self
            .distances
            .ok_or_else(|| MatrixError::Malformed("missing distances".to_string()))?;

        let matrices = TravelMatrices::new(
            dense(durations, expected, "durations")?,
            dense(distances, expected, "distances")?,
            MatrixSource::Routed,
        );
        matrices.validate().map_err(MatrixError::Malformed)?;

        Ok(matrices)
    }
}

/// OSRM reports unroutable pairs as `null`; any such cell rejects the table.
fn dense(
    table: Vec<Vec<Option<f64>>>,
    expected: usize,
    label: &str,
) -> Result<Vec<Vec<f64>>, MatrixError> {
    if table.len() != expected {
        return Err(MatrixError::Malformed(format!(
            "{} has {} rows, expected {}",
            label,
            table.len(),
            expected
        )));
    }

    table
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            if row.len() != expected {
                return Err(MatrixError::Malformed(format!(
                    "{} row {} has {} cells, expected {}",
                    label,
                    i,
                    row.len(),
                    expected
                )));
            }
            row.into_iter()
                .enumerate()
                .map(|(j, cell)| {
                    cell.ok_or_else(|| {
                        MatrixError::Malformed(format!("{} [{}][{}] is null", label, i, j))
                    })
                })
                .collect()
        })
        .collect()
}
