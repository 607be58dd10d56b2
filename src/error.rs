//! Error types for matrix acquisition and route planning.

use std::fmt;

/// Failure of the live routing query.
///
/// Never escapes [`crate::matrix::GeoMatrixProvider`]; it triggers the
/// geometric fallback instead.
#[derive(Debug)]
pub enum MatrixError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    Malformed(String),
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::Http(err) => write!(f, "routing request failed: {}", err),
            MatrixError::Status(status) => write!(f, "routing service returned {}", status),
            MatrixError::Malformed(reason) => write!(f, "malformed routing payload: {}", reason),
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatrixError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MatrixError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => MatrixError::Status(status),
            None => MatrixError::Http(err),
        }
    }
}

/// Planning failure surfaced to the caller. No partial route accompanies it.
#[derive(Debug)]
pub enum PlanError {
    /// The sequencer could not build a tour (empty or degenerate matrix).
    NoSolutionFound(String),
    /// The clustering primitive rejected its input.
    Clustering(String),
    /// A stop carries a missing or non-numeric coordinate.
    MalformedStop { name: String, reason: String },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::NoSolutionFound(reason) => write!(f, "no route found: {}", reason),
            PlanError::Clustering(reason) => write!(f, "zone clustering failed: {}", reason),
            PlanError::MalformedStop { name, reason } => {
                write!(f, "stop '{}' is malformed: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for PlanError {}
