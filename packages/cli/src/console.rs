//! Terminal map explorer.
//!
//! Drives a live [`MapSession`] over the dummy incident dataset: camera
//! movement with the proximity-gated refetch, place search, incident and
//! marker selection, marker authoring with optional AI summarization, and
//! the assistant chat.

use dialoguer::{Confirm, Input, Select};
use map_marks_ai::flows::{self, ChatMessage, ChatRequest, ChatRole};
use map_marks_ai::providers::{PromptProvider, create_provider_from_env};
use map_marks_geo_models::Coordinate;
use map_marks_geocoder::nominatim;
use map_marks_incident::dummy::DummyIncidentSource;
use map_marks_incident_models::{EventType, MarkerDraft};
use map_marks_session::{FetchOutcome, MapSession};

/// Zoom level applied when jumping to a searched place.
const PLACE_ZOOM: u8 = 15;

/// One action in the explorer menu.
enum Action {
    ShowMap,
    MoveCamera,
    JumpToPlace,
    FocusLocation,
    SelectItem,
    AddMarker,
    DeleteMarker,
    DragMarker,
    Chat,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ShowMap,
        Self::MoveCamera,
        Self::JumpToPlace,
        Self::FocusLocation,
        Self::SelectItem,
        Self::AddMarker,
        Self::DeleteMarker,
        Self::DragMarker,
        Self::Chat,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ShowMap => "Show map state",
            Self::MoveCamera => "Move the camera",
            Self::JumpToPlace => "Search for a place",
            Self::FocusLocation => "Focus my location",
            Self::SelectItem => "Select an incident or marker",
            Self::AddMarker => "Add a marker here",
            Self::DeleteMarker => "Delete a marker",
            Self::DragMarker => "Drag a marker",
            Self::Chat => "Chat with the assistant",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the terminal map explorer.
///
/// # Errors
///
/// Returns an error if terminal interaction fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let provider = match create_provider_from_env() {
        Ok(p) => Some(p),
        Err(e) => {
            log::warn!("AI provider unavailable: {e}");
            None
        }
    };

    let http = reqwest::Client::new();
    let nominatim_base = map_marks_geocoder::base_url_from_env();

    let mut session = MapSession::new(DummyIncidentSource::new());

    println!("Loading incidents near the starting viewport...");
    let request = session.initial_fetch();
    report_outcome(&session.perform(request).await);

    loop {
        println!();
        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt("Map")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::ShowMap => show_map(&session),
            Action::MoveCamera => {
                let center = prompt_coordinate("New camera center")?;
                let zoom = session.tracker().zoom();
                match session.on_camera_changed(center, zoom) {
                    Some(request) => report_outcome(&session.perform(request).await),
                    None => println!("Moved. Still within the refetch threshold."),
                }
            }
            Action::JumpToPlace => {
                jump_to_place(&mut session, &http, &nominatim_base).await?;
            }
            Action::FocusLocation => {
                let center = prompt_coordinate("Your location")?;
                let request = session.on_focus_user_location(center);
                report_outcome(&session.perform(request).await);
            }
            Action::SelectItem => select_item(&mut session)?,
            Action::AddMarker => {
                add_marker(&mut session, provider.as_deref(), &http, &nominatim_base).await?;
            }
            Action::DeleteMarker => delete_marker(&mut session)?,
            Action::DragMarker => drag_marker(&mut session)?,
            Action::Chat => chat_loop(provider.as_deref()).await?,
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Prints the current viewport, incidents, markers, and selection.
fn show_map<S: map_marks_incident::IncidentSource>(session: &MapSession<S>) {
    let tracker = session.tracker();
    println!(
        "Camera: {} (zoom {})",
        tracker.center(),
        tracker.zoom()
    );
    match tracker.last_fetch_center() {
        Some(center) => println!("Last fetch: {center}"),
        None => println!("Last fetch: none yet"),
    }

    let store = session.store();
    if store.incidents().is_empty() {
        println!("No incidents nearby.");
    } else {
        println!("Incidents:");
        for incident in store.incidents() {
            let name = incident.location_name.as_deref().unwrap_or("unknown");
            println!("  - {} ({name}, {})", incident.title, incident.location);
        }
    }

    if store.markers().is_empty() {
        println!("No markers reported yet.");
    } else {
        println!("Markers:");
        for marker in store.markers() {
            println!(
                "  - [{}] {}: {}",
                marker.id,
                marker.event_type.label(),
                marker.description
            );
        }
    }

    if let Some(incident) = store.selected_incident() {
        println!("Selected incident: {}", incident.title);
        if let Some(description) = &incident.description {
            println!("  {description}");
        }
        for comment in &incident.comments {
            println!("  > {comment}");
        }
    } else if let Some(marker) = store.selected_marker() {
        println!(
            "Selected marker: {} — {}",
            marker.event_type.label(),
            marker.description
        );
    } else {
        println!("Nothing selected.");
    }
}

/// Searches Nominatim and jumps the camera to the chosen result.
async fn jump_to_place<S: map_marks_incident::IncidentSource>(
    session: &mut MapSession<S>,
    http: &reqwest::Client,
    nominatim_base: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let query: String = Input::new().with_prompt("Search").interact_text()?;

    let places = match nominatim::search(http, nominatim_base, &query, 5).await {
        Ok(places) => places,
        Err(e) => {
            println!("Search failed: {e}");
            return Ok(());
        }
    };

    if places.is_empty() {
        println!("No places found for {query:?}.");
        return Ok(());
    }

    let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Jump to")
        .items(&names)
        .default(0)
        .interact()?;

    let request = session.on_place_selected(places[idx].location, PLACE_ZOOM);
    report_outcome(&session.perform(request).await);
    Ok(())
}

/// Selects an incident or marker, or clears the selection.
fn select_item<S: map_marks_incident::IncidentSource>(
    session: &mut MapSession<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = session.store();

    let mut labels: Vec<String> = Vec::new();
    let mut ids: Vec<Option<String>> = Vec::new();

    for incident in store.incidents() {
        if let Some(id) = incident.id() {
            labels.push(format!("incident: {}", incident.title));
            ids.push(Some(id.to_string()));
        }
    }
    for marker in store.markers() {
        labels.push(format!(
            "marker: {} — {}",
            marker.event_type.label(),
            marker.description
        ));
        ids.push(Some(marker.id.clone()));
    }
    labels.push("Clear selection".to_string());
    ids.push(None);

    let idx = Select::new()
        .with_prompt("Select")
        .items(&labels)
        .default(0)
        .interact()?;

    match &ids[idx] {
        Some(id) => session.store_mut().select(id.clone()),
        None => session.store_mut().clear(),
    }
    Ok(())
}

/// Authors a new marker at the current camera center.
async fn add_marker<S: map_marks_incident::IncidentSource>(
    session: &mut MapSession<S>,
    provider: Option<&dyn PromptProvider>,
    http: &reqwest::Client,
    nominatim_base: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let position = session.tracker().center();

    let type_labels: Vec<&str> = EventType::all().iter().map(|t| t.label()).collect();
    let type_idx = Select::new()
        .with_prompt("Incident type")
        .items(&type_labels)
        .default(0)
        .interact()?;
    let event_type = EventType::all()[type_idx];

    let mut description: String = Input::new()
        .with_prompt("Description (empty to use the address)")
        .allow_empty(true)
        .interact_text()?;

    if description.trim().is_empty() {
        // The original fills an empty description with the reverse-geocoded
        // address, falling back to the raw coordinates.
        description = match nominatim::reverse(http, nominatim_base, position).await {
            Ok(Some(address)) => address,
            Ok(None) => position.to_string(),
            Err(e) => {
                log::warn!("Reverse geocoding failed: {e}");
                format!("{position} (Could not fetch address)")
            }
        };
    } else if let Some(provider) = provider
        && description.trim().chars().count() >= flows::MIN_SUMMARIZE_LEN
        && Confirm::new()
            .with_prompt("Summarize with AI?")
            .default(false)
            .interact()?
    {
        match flows::summarize_event_details(provider, &description).await {
            Ok(result) => {
                println!("Summary: {}", result.summary);
                description = result.summary;
            }
            Err(e) => println!("Summarization failed: {e}"),
        }
    }

    let id = session.store_mut().add_marker(MarkerDraft {
        lat: position.latitude,
        lng: position.longitude,
        event_type,
        description,
    });
    session.store_mut().select(id.clone());
    println!("Added marker {id}.");
    Ok(())
}

/// Deletes a marker chosen from the list.
fn delete_marker<S: map_marks_incident::IncidentSource>(
    session: &mut MapSession<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some((labels, ids)) = marker_choices(session) else {
        println!("No markers to delete.");
        return Ok(());
    };

    let idx = Select::new()
        .with_prompt("Delete which marker?")
        .items(&labels)
        .default(0)
        .interact()?;

    if Confirm::new()
        .with_prompt("This will permanently delete the incident marker. Are you sure?")
        .default(false)
        .interact()?
    {
        session.store_mut().delete_marker(&ids[idx]);
        println!("Incident marker removed.");
    }
    Ok(())
}

/// Moves a marker chosen from the list to a new position.
fn drag_marker<S: map_marks_incident::IncidentSource>(
    session: &mut MapSession<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some((labels, ids)) = marker_choices(session) else {
        println!("No markers to drag.");
        return Ok(());
    };

    let idx = Select::new()
        .with_prompt("Drag which marker?")
        .items(&labels)
        .default(0)
        .interact()?;

    let position = prompt_coordinate("New position")?;
    session.store_mut().drag_end(&ids[idx], position);
    println!("Marker moved to {position}.");
    Ok(())
}

/// The assistant chat loop. An empty message returns to the menu.
async fn chat_loop(
    provider: Option<&dyn PromptProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(provider) = provider else {
        println!("Chat unavailable: no AI provider configured (set GEMINI_API_KEY).");
        return Ok(());
    };

    let mut history: Vec<ChatMessage> = Vec::new();
    println!("Chat with the MapMarks assistant. Empty message to exit.");

    loop {
        let message: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        if message.trim().is_empty() {
            return Ok(());
        }

        let request = ChatRequest {
            history: history.clone(),
            message: message.clone(),
        };

        match flows::chat(provider, &request).await {
            Ok(reply) => {
                println!("Assistant: {}", reply.reply);
                history.push(ChatMessage {
                    role: ChatRole::User,
                    content: message,
                });
                history.push(ChatMessage {
                    role: ChatRole::Model,
                    content: reply.reply,
                });
            }
            Err(e) => println!("Sorry, I encountered an error. Please try again. ({e})"),
        }
    }
}

/// Labels and ids of the current markers, or `None` when there are none.
fn marker_choices<S: map_marks_incident::IncidentSource>(
    session: &MapSession<S>,
) -> Option<(Vec<String>, Vec<String>)> {
    let markers = session.store().markers();
    if markers.is_empty() {
        return None;
    }

    let labels = markers
        .iter()
        .map(|m| format!("{} — {}", m.event_type.label(), m.description))
        .collect();
    let ids = markers.iter().map(|m| m.id.clone()).collect();
    Some((labels, ids))
}

/// Prompts for a latitude/longitude pair.
fn prompt_coordinate(prompt: &str) -> Result<Coordinate, Box<dyn std::error::Error>> {
    let lat: f64 = Input::new()
        .with_prompt(format!("{prompt} latitude"))
        .interact_text()?;
    let lng: f64 = Input::new()
        .with_prompt(format!("{prompt} longitude"))
        .interact_text()?;
    Ok(Coordinate::new(lat, lng))
}

/// Prints a fetch outcome as a user-facing notification.
fn report_outcome(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Applied { count } => println!("Loaded {count} incidents."),
        FetchOutcome::Stale => println!("Discarded a stale incident response."),
        FetchOutcome::Failed { message } => println!("{message}"),
    }
}
