#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Marker and incident selection state.
//!
//! The [`SelectionStore`] is the single source of truth for what is
//! currently shown as markers and what is open in the detail view. It
//! mediates between map-marker clicks, list-item clicks, and the detail
//! panel.
//!
//! Selection is held as a bare identifier and resolved lazily at read
//! time: a selected id that matches no current incident or marker reads
//! back as "nothing selected", never as an error.

pub mod overlay;

use map_marks_geo_models::Coordinate;
use map_marks_incident_models::{Incident, MarkerData, MarkerDraft};

/// Owns the displayed incident list, the locally authored markers, and the
/// current selection.
#[derive(Debug, Default)]
pub struct SelectionStore {
    incidents: Vec<Incident>,
    markers: Vec<MarkerData>,
    selected: Option<String>,
}

impl SelectionStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            incidents: Vec::new(),
            markers: Vec::new(),
            selected: None,
        }
    }

    /// The incidents currently displayed as markers.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// The locally authored markers.
    #[must_use]
    pub fn markers(&self) -> &[MarkerData] {
        &self.markers
    }

    /// The raw selected identifier, if any. Prefer the lazy lookups
    /// [`Self::selected_incident`] / [`Self::selected_marker`] for display.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Atomically replaces the incident list with a fetch result.
    ///
    /// No incremental merge or diff is performed. Contract: a selected
    /// incident id that is absent from the new list is cleared here, so
    /// the detail view deterministically reads as closed after a refresh.
    /// A selected local marker is never cleared by an incident refresh.
    pub fn replace_incidents(&mut self, new_list: Vec<Incident>) {
        self.incidents = new_list;

        if let Some(selected) = &self.selected {
            let still_marker = self.markers.iter().any(|m| &m.id == selected);
            let still_incident = self
                .incidents
                .iter()
                .any(|i| i.id() == Some(selected.as_str()));
            if !still_marker && !still_incident {
                self.selected = None;
            }
        }
    }

    /// Sets the selection. No validation that the id exists; validity is
    /// resolved lazily at read time.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// The selected incident, if the selected id matches one.
    #[must_use]
    pub fn selected_incident(&self) -> Option<&Incident> {
        let selected = self.selected.as_deref()?;
        self.incidents.iter().find(|i| i.id() == Some(selected))
    }

    /// The selected local marker, if the selected id matches one.
    #[must_use]
    pub fn selected_marker(&self) -> Option<&MarkerData> {
        let selected = self.selected.as_deref()?;
        self.markers.iter().find(|m| m.id == selected)
    }

    /// Adds a locally authored marker and returns its assigned id.
    ///
    /// Ids are time-derived (epoch milliseconds); when two markers are
    /// created within the same millisecond the value is bumped until
    /// unique, so the id stays stable and unique for the process lifetime.
    pub fn add_marker(&mut self, draft: MarkerDraft) -> String {
        let mut millis = chrono::Utc::now().timestamp_millis();
        while self.markers.iter().any(|m| m.id == millis.to_string()) {
            millis += 1;
        }
        let id = millis.to_string();

        self.markers.push(MarkerData {
            id: id.clone(),
            lat: draft.lat,
            lng: draft.lng,
            event_type: draft.event_type,
            description: draft.description,
        });

        id
    }

    /// Removes the local marker with the given id.
    ///
    /// Idempotent: an unknown id is a no-op, not an error. Deleting the
    /// currently selected marker clears the selection. Returns whether a
    /// marker was removed.
    pub fn delete_marker(&mut self, id: &str) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        let removed = self.markers.len() != before;

        if removed && self.selected.as_deref() == Some(id) {
            self.selected = None;
        }

        removed
    }

    /// Moves the local marker with the given id to `position`.
    ///
    /// Only the matching marker's coordinates change; every other marker
    /// and the selection are untouched. An unknown id is a no-op.
    pub fn drag_end(&mut self, id: &str, position: Coordinate) {
        if let Some(marker) = self.markers.iter_mut().find(|m| m.id == id) {
            marker.lat = position.latitude;
            marker.lng = position.longitude;
        } else {
            log::debug!("drag_end for unknown marker {id}");
        }
    }
}
