//! HTTP incident source.
//!
//! Fetches incidents from a MapMarks-compatible backend:
//! `GET {base}/api/incidents?lat=..&lng=..`. A failed fetch is returned to
//! the caller as-is; no retry is performed here.

use map_marks_geo_models::Coordinate;
use map_marks_incident_models::Incident;

use crate::{IncidentError, IncidentSource};

/// An [`IncidentSource`] backed by a remote incidents API.
pub struct HttpIncidentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIncidentSource {
    /// Creates a source pointing at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl IncidentSource for HttpIncidentSource {
    async fn fetch_incidents(&self, center: Coordinate) -> Result<Vec<Incident>, IncidentError> {
        let url = format!("{}/api/incidents", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("lat", center.latitude.to_string()),
                ("lng", center.longitude.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IncidentError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let incidents = parse_incidents(&body)?;
        Ok(incidents)
    }
}

/// Parses the incidents response body.
fn parse_incidents(body: &str) -> Result<Vec<Incident>, IncidentError> {
    Ok(serde_json::from_str(body)?)
}
