#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the MapMarks server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the internal incident types to allow independent evolution of the
//! API contract. The chat and summarize endpoints reuse the flow types
//! from `map_marks_ai` directly, since those already are the wire format.

use map_marks_geocoder::Place;
use map_marks_incident_models::Incident;
use serde::{Deserialize, Serialize};

/// An incident as returned by the API, with the position flattened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncident {
    /// Short headline.
    pub title: String,
    /// URI of the associated image.
    pub image_url: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// User comments in display order.
    pub comments: Vec<String>,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Upvote count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<u64>,
    /// Downvote count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislikes_count: Option<u64>,
    /// Human-readable place name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Canonical URL of the original report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<Incident> for ApiIncident {
    fn from(incident: Incident) -> Self {
        Self {
            title: incident.title,
            image_url: incident.image_url,
            latitude: incident.location.latitude,
            longitude: incident.location.longitude,
            comments: incident.comments,
            description: incident.description,
            likes_count: incident.likes_count,
            dislikes_count: incident.dislikes_count,
            location_name: incident.location_name,
            url: incident.url,
        }
    }
}

/// Query parameters for the incidents endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentQueryParams {
    /// Map center latitude.
    pub lat: f64,
    /// Map center longitude.
    pub lng: f64,
}

/// Request body for the summarize endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// The detailed description of the event to be summarized.
    pub event_details: String,
}

/// Query parameters for the reverse-geocode endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseQueryParams {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Response from the reverse-geocode endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAddress {
    /// Formatted address, or `None` when the position has no address.
    pub address: Option<String>,
}

/// Query parameters for the place-search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryParams {
    /// Free-form query text.
    pub q: String,
    /// Maximum number of results (default 5).
    pub limit: Option<u8>,
}

/// A place as returned by the search endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlace {
    /// Display name.
    pub name: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl From<Place> for ApiPlace {
    fn from(place: Place) -> Self {
        Self {
            name: place.name,
            latitude: place.location.latitude,
            longitude: place.location.longitude,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Client configuration surface.
///
/// The map UI needs the maps API key to render at all; when it is absent
/// the client shows a full-screen configuration message instead of
/// crashing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Maps API key, or `None` when the server has none configured.
    pub maps_api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use map_marks_geo_models::Coordinate;

    use super::*;

    #[test]
    fn api_incident_flattens_the_position() {
        let incident = Incident {
            title: "Road Blocked in Suryapet".to_string(),
            image_url: "https://placehold.co/600x400.png".to_string(),
            location: Coordinate::new(17.14, 79.62),
            comments: vec!["Traffic diverted.".to_string()],
            description: None,
            likes_count: Some(95),
            dislikes_count: Some(2),
            location_name: Some("Suryapet".to_string()),
            source: None,
            url: Some("https://x.com/post/203".to_string()),
        };

        let api = ApiIncident::from(incident);
        let json = serde_json::to_value(&api).unwrap();

        assert!((json["latitude"].as_f64().unwrap() - 17.14).abs() < 1e-9);
        assert!((json["longitude"].as_f64().unwrap() - 79.62).abs() < 1e-9);
        assert_eq!(json["likesCount"], 95);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn incident_query_params_parse_from_query_names() {
        let params: IncidentQueryParams =
            serde_json::from_str(r#"{"lat": 17.0544, "lng": 79.2671}"#).unwrap();
        assert!((params.lat - 17.0544).abs() < 1e-9);
        assert!((params.lng - 79.2671).abs() < 1e-9);
    }
}
