#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident data collaborator.
//!
//! Defines the [`IncidentSource`] seam the map core fetches through, plus
//! two implementations: an in-memory dummy dataset with a simulated network
//! delay, and an HTTP client for a real incidents backend.
//!
//! The contract assumed by the core: the result is an unordered list, no
//! pagination, no partial results. A call resolves or rejects as a whole
//! and the returned list *replaces* (does not merge with) the prior one.

pub mod dummy;
pub mod http;

use map_marks_geo_models::Coordinate;
use map_marks_incident_models::Incident;
use thiserror::Error;

/// Errors from incident data operations.
#[derive(Debug, Error)]
pub enum IncidentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend returned a non-success status.
    #[error("Backend error: HTTP {status}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
    },
}

/// A collaborator that serves incidents near a map center.
///
/// Failures are surfaced to the caller and never retried here; the
/// viewport baseline only advances on success, so the next sufficient
/// camera movement naturally retries.
#[async_trait::async_trait]
pub trait IncidentSource: Send + Sync {
    /// Fetches the incidents near `center`.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentError`] if the fetch fails as a whole.
    async fn fetch_incidents(&self, center: Coordinate) -> Result<Vec<Incident>, IncidentError>;
}
