//! HTTP handler functions for the MapMarks API.

use actix_web::{HttpResponse, web};
use map_marks_ai::AiError;
use map_marks_ai::flows::{self, ChatRequest};
use map_marks_geo_models::Coordinate;
use map_marks_geocoder::nominatim;
use map_marks_server_models::{
    ApiAddress, ApiConfig, ApiHealth, ApiIncident, ApiPlace, IncidentQueryParams,
    ReverseQueryParams, SearchQueryParams, SummarizeRequest,
};

use crate::AppState;

/// Default result count for place search.
const SEARCH_LIMIT: u8 = 5;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/config`
///
/// Client configuration. The maps API key is `null` when unset; the
/// client renders a full-screen configuration message in that case.
pub async fn config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiConfig {
        maps_api_key: state.maps_api_key.clone(),
    })
}

/// `GET /api/incidents?lat=..&lng=..`
///
/// Incidents near the given map center.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<IncidentQueryParams>,
) -> HttpResponse {
    let center = Coordinate::new(params.lat, params.lng);

    match state.incidents.fetch_incidents(center).await {
        Ok(list) => {
            let api_incidents: Vec<ApiIncident> =
                list.into_iter().map(ApiIncident::from).collect();
            HttpResponse::Ok().json(api_incidents)
        }
        Err(e) => {
            log::error!("Failed to fetch incidents near {center}: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Failed to fetch incidents"
            }))
        }
    }
}

/// `POST /api/summarize`
///
/// Summarizes an event description.
pub async fn summarize(
    state: web::Data<AppState>,
    body: web::Json<SummarizeRequest>,
) -> HttpResponse {
    let Some(provider) = &state.provider else {
        return ai_unconfigured();
    };

    match flows::summarize_event_details(provider.as_ref(), &body.event_details).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => ai_error_response("summarize", &e),
    }
}

/// `POST /api/chat`
///
/// One turn of the assistant conversation.
pub async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> HttpResponse {
    let Some(provider) = &state.provider else {
        return ai_unconfigured();
    };

    match flows::chat(provider.as_ref(), &body).await {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(e) => ai_error_response("chat", &e),
    }
}

/// `GET /api/geocode/reverse?lat=..&lng=..`
pub async fn reverse_geocode(
    state: web::Data<AppState>,
    params: web::Query<ReverseQueryParams>,
) -> HttpResponse {
    let position = Coordinate::new(params.lat, params.lng);

    match nominatim::reverse(&state.http, &state.nominatim_base, position).await {
        Ok(address) => HttpResponse::Ok().json(ApiAddress { address }),
        Err(e) => {
            log::error!("Reverse geocoding {position} failed: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Reverse geocoding failed"
            }))
        }
    }
}

/// `GET /api/geocode/search?q=..`
pub async fn search_places(
    state: web::Data<AppState>,
    params: web::Query<SearchQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(SEARCH_LIMIT);

    match nominatim::search(&state.http, &state.nominatim_base, &params.q, limit).await {
        Ok(places) => {
            let api_places: Vec<ApiPlace> = places.into_iter().map(ApiPlace::from).collect();
            HttpResponse::Ok().json(api_places)
        }
        Err(e) => {
            log::error!("Place search for {:?} failed: {e}", params.q);
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Place search failed"
            }))
        }
    }
}

/// 503 response for AI endpoints when no provider is configured.
fn ai_unconfigured() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(serde_json::json!({
        "error": "AI provider not configured"
    }))
}

/// Maps an [`AiError`] to the appropriate HTTP response.
fn ai_error_response(endpoint: &str, e: &AiError) -> HttpResponse {
    match e {
        AiError::InvalidInput { message } => HttpResponse::BadRequest().json(serde_json::json!({
            "error": message
        })),
        _ => {
            log::error!("AI {endpoint} call failed: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "AI request failed"
            }))
        }
    }
}
