//! Nominatim / OpenStreetMap client.

use map_marks_geo_models::Coordinate;

use crate::{GeocodeError, Place};

/// Looks up the formatted address for a coordinate using the Nominatim
/// reverse endpoint.
///
/// Returns `None` when Nominatim has no address for the position (open
/// water, poles); the caller falls back to a raw `lat: .., lng: ..`
/// description.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn reverse(
    client: &reqwest::Client,
    base_url: &str,
    position: Coordinate,
) -> Result<Option<String>, GeocodeError> {
    let resp = client
        .get(format!("{base_url}/reverse"))
        .query(&[
            ("lat", position.latitude.to_string()),
            ("lon", position.longitude.to_string()),
            ("format", "jsonv2".to_string()),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_reverse_response(&body))
}

/// Searches for places matching a free-form query.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn search(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    limit: u8,
) -> Result<Vec<Place>, GeocodeError> {
    let resp = client
        .get(format!("{base_url}/search"))
        .query(&[
            ("q", query),
            ("format", "jsonv2"),
            ("limit", &limit.to_string()),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    parse_search_response(&body)
}

/// Parses a Nominatim reverse-geocoding response.
fn parse_reverse_response(body: &serde_json::Value) -> Option<String> {
    // An unmatched position comes back as {"error": "Unable to geocode"}.
    if body.get("error").is_some() {
        return None;
    }
    body["display_name"].as_str().map(String::from)
}

/// Parses a Nominatim search response.
fn parse_search_response(body: &serde_json::Value) -> Result<Vec<Place>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let mut places = Vec::with_capacity(results.len());
    for entry in results {
        let lat = entry["lat"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| GeocodeError::Parse {
                message: "Missing lat in Nominatim response".to_string(),
            })?;

        let lon = entry["lon"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| GeocodeError::Parse {
                message: "Missing lon in Nominatim response".to_string(),
            })?;

        let name = entry["display_name"].as_str().unwrap_or_default().to_string();

        places.push(Place {
            name,
            location: Coordinate::new(lat, lon),
        });
    }

    Ok(places)
}
