//! Test fixtures for visit-planner.
//!
//! Provides:
//! - Store locations around Sao Paulo, grouped by neighbourhood
//! - Builders for stops of a single representative

pub mod sao_paulo_stores;

pub use sao_paulo_stores::*;
