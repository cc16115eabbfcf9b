#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident and marker data types.
//!
//! This crate defines the canonical incident record returned by the data
//! collaborator and the locally authored marker type, shared across the
//! entire MapMarks system.

use map_marks_geo_models::Coordinate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The closed set of reportable incident types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EventType {
    /// A public event or gathering.
    Event,
    /// A power outage.
    PowerOutage,
    /// Waterlogging / localized flooding.
    Waterlogging,
}

impl EventType {
    /// Human-readable label for list items and detail panels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::PowerOutage => "Power Outage",
            Self::Waterlogging => "Waterlogging",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Event, Self::PowerOutage, Self::Waterlogging]
    }
}

/// A reported incident as returned by the incident-data collaborator.
///
/// `url` doubles as the stable identity when present; an incident without
/// one can never be matched by a selection lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Short headline.
    pub title: String,
    /// URI of the associated image.
    pub image_url: String,
    /// Where the incident happened.
    pub location: Coordinate,
    /// User comments, insertion order = display order.
    pub comments: Vec<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Upvote count from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<u64>,
    /// Downvote count from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislikes_count: Option<u64>,
    /// Human-readable place name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Which source reported this incident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Canonical URL of the original report; stable identity when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Incident {
    /// The stable identifier for selection, when one exists.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// A user-created, locally held marker.
///
/// Created on form submission, held only in process memory, destroyed on
/// deletion or restart. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerData {
    /// Unique time-derived identifier.
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Incident type.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Free-form description (or the reverse-geocoded address).
    pub description: String,
}

impl MarkerData {
    /// The marker's position as a [`Coordinate`].
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// A marker as submitted by the add-marker form, before the store assigns
/// an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDraft {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Incident type.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Free-form description (or the reverse-geocoded address).
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&EventType::PowerOutage).unwrap(),
            "\"power-outage\""
        );
        assert_eq!(EventType::Waterlogging.to_string(), "waterlogging");
    }

    #[test]
    fn event_type_parses_from_wire_name() {
        let parsed: EventType = "power-outage".parse().unwrap();
        assert_eq!(parsed, EventType::PowerOutage);
        assert!("earthquake".parse::<EventType>().is_err());
    }

    #[test]
    fn labels_cover_all_variants() {
        for et in EventType::all() {
            assert!(!et.label().is_empty());
        }
    }

    #[test]
    fn incident_identity_is_url() {
        let mut incident = Incident {
            title: "Fire Accident in Nalgonda".to_string(),
            image_url: "https://placehold.co/600x400.png".to_string(),
            location: Coordinate::new(17.0544, 79.2671),
            comments: vec!["Fire services on site.".to_string()],
            description: None,
            likes_count: None,
            dislikes_count: None,
            location_name: None,
            source: None,
            url: Some("https://x.com/post/202".to_string()),
        };
        assert_eq!(incident.id(), Some("https://x.com/post/202"));

        incident.url = None;
        assert_eq!(incident.id(), None);
    }

    #[test]
    fn marker_round_trips_with_type_field() {
        let marker = MarkerData {
            id: "1700000000000".to_string(),
            lat: 17.14,
            lng: 79.62,
            event_type: EventType::Waterlogging,
            description: "Road blocked".to_string(),
        };
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["type"], "waterlogging");
        let back: MarkerData = serde_json::from_value(json).unwrap();
        assert_eq!(back, marker);
    }
}
