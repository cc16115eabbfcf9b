#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geographic value types and distance math.
//!
//! This crate defines the [`Coordinate`] type shared across the entire
//! MapMarks system and the great-circle distance used to gate incident
//! refetching on camera movement.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, for the spherical distance model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in WGS84 degrees.
///
/// No range validation is performed; latitude is conventionally in
/// [-90, 90] and longitude in [-180, 180], but out-of-range values pass
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude/longitude degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// Haversine formula on a sphere of radius [`EARTH_RADIUS_KM`]:
    ///
    /// ```text
    /// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
    /// d = 2·R·atan2(√a, √(1−a))
    /// ```
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lat: {}, lng: {}", self.latitude, self.longitude)
    }
}
