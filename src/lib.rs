//! visit-planner
//!
//! Monthly store-visit planning for a field representative: weekly zones,
//! second visits, travel matrices with a geometric fallback, and an open
//! single-vehicle tour.

pub mod config;
pub mod csv_io;
pub mod error;
pub mod haversine;
pub mod matrix;
pub mod osrm;
pub mod pipeline;
pub mod planar;
pub mod recurrence;
pub mod report;
pub mod solver;
pub mod stop;
pub mod traits;
pub mod zones;

pub use config::{EstimatorKind, Grouping, PlannerConfig};
pub use error::{MatrixError, PlanError};
pub use pipeline::{PlanOutcome, Planner};
pub use stop::Stop;
