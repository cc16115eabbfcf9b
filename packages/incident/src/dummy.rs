//! In-memory dummy incident source.
//!
//! Serves a fixed dataset of reports from the Nalgonda district with a
//! simulated network delay, standing in for a real incidents backend.

use std::time::Duration;

use map_marks_geo_models::Coordinate;
use map_marks_incident_models::Incident;

use crate::{IncidentError, IncidentSource};

/// Simulated network delay for each fetch.
const RESPONSE_DELAY: Duration = Duration::from_millis(500);

/// Placeholder image attached to every dummy incident.
const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400.png";

/// An [`IncidentSource`] backed by a fixed in-memory dataset.
pub struct DummyIncidentSource {
    delay: Duration,
}

impl Default for DummyIncidentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyIncidentSource {
    /// Creates a dummy source with the standard simulated delay.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delay: RESPONSE_DELAY,
        }
    }

    /// Creates a dummy source with a custom delay (zero for tests).
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// The fixed dataset, with the placeholder image attached.
    fn dataset() -> Vec<Incident> {
        vec![
            Incident {
                title: "Water-logging in Miryalaguda".to_string(),
                image_url: PLACEHOLDER_IMAGE.to_string(),
                location: Coordinate::new(16.8722, 79.5626),
                comments: vec![
                    "Flooding reported near bus stand.".to_string(),
                    "Stay safe!".to_string(),
                ],
                description: Some(
                    "Heavy rains caused water-logging in Miryalaguda town.".to_string(),
                ),
                likes_count: Some(210),
                dislikes_count: Some(8),
                location_name: Some("Miryalaguda".to_string()),
                source: None,
                url: Some("https://x.com/post/201".to_string()),
            },
            Incident {
                title: "Fire Accident in Nalgonda".to_string(),
                image_url: PLACEHOLDER_IMAGE.to_string(),
                location: Coordinate::new(17.0544, 79.2671),
                comments: vec![
                    "Fire accident at market area.".to_string(),
                    "Fire services on site.".to_string(),
                ],
                description: Some(
                    "A fire broke out in the Nalgonda market area, no casualties reported."
                        .to_string(),
                ),
                likes_count: Some(180),
                dislikes_count: Some(3),
                location_name: Some("Nalgonda".to_string()),
                source: None,
                url: Some("https://x.com/post/202".to_string()),
            },
            Incident {
                title: "Road Blocked in Suryapet".to_string(),
                image_url: PLACEHOLDER_IMAGE.to_string(),
                location: Coordinate::new(17.14, 79.62),
                comments: vec![
                    "Road blocked due to water-logging.".to_string(),
                    "Traffic diverted.".to_string(),
                ],
                description: Some(
                    "Water-logging has blocked the main road in Suryapet.".to_string(),
                ),
                likes_count: Some(95),
                dislikes_count: Some(2),
                location_name: Some("Suryapet".to_string()),
                source: None,
                url: Some("https://x.com/post/203".to_string()),
            },
        ]
    }
}

#[async_trait::async_trait]
impl IncidentSource for DummyIncidentSource {
    async fn fetch_incidents(&self, center: Coordinate) -> Result<Vec<Incident>, IncidentError> {
        log::debug!("Fetching incidents near {center}");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(Self::dataset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_the_full_dataset() {
        let source = DummyIncidentSource::with_delay(Duration::ZERO);
        let incidents = source
            .fetch_incidents(Coordinate::new(17.0, 79.3))
            .await
            .unwrap();

        assert_eq!(incidents.len(), 3);
        assert!(incidents.iter().all(|i| i.url.is_some()));
        assert!(incidents.iter().all(|i| !i.comments.is_empty()));
    }

    #[tokio::test]
    async fn every_incident_resolves_to_one_coordinate() {
        let source = DummyIncidentSource::with_delay(Duration::ZERO);
        let incidents = source
            .fetch_incidents(Coordinate::new(0.0, 0.0))
            .await
            .unwrap();

        for incident in &incidents {
            assert!(incident.location.latitude.is_finite());
            assert!(incident.location.longitude.is_finite());
        }
    }
}
