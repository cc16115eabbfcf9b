#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding pass-through for MapMarks.
//!
//! Thin client over Nominatim / OpenStreetMap: reverse geocoding (fill a
//! new marker's description with its street address) and free-form place
//! search (the location-search box).
//!
//! The public Nominatim instance has strict rate limits: **1 request per
//! second** maximum. The caller is responsible for rate limiting; point
//! `NOMINATIM_URL` at a self-hosted instance to go faster.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

pub mod nominatim;

use map_marks_geo_models::Coordinate;
use thiserror::Error;

/// Default Nominatim endpoint.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// A place returned by the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Display name (formatted address).
    pub name: String,
    /// Position of the place.
    pub location: Coordinate,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Reads the Nominatim base URL from `NOMINATIM_URL`, falling back to the
/// public instance.
#[must_use]
pub fn base_url_from_env() -> String {
    std::env::var("NOMINATIM_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}
