#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Event-driven map session.
//!
//! Wires the viewport tracker, the selection store, and the incident data
//! collaborator into the application control flow: camera movement →
//! distance gate → conditional fetch → atomic incident-list replacement →
//! marker re-render → selection updates.
//!
//! Every state transition runs to completion on the caller's event loop;
//! the only suspension point is the collaborator fetch. Concurrent
//! outstanding fetches are allowed, and the viewport's fetch generations
//! guarantee that application order is last-issued-wins: a stale
//! completion is discarded instead of overwriting a newer result.

use map_marks_geo_models::Coordinate;
use map_marks_incident::{IncidentError, IncidentSource};
use map_marks_incident_models::Incident;
use map_marks_selection::SelectionStore;
use map_marks_viewport::{CameraDecision, FetchGeneration, ViewportTracker};

/// A fetch issued by the session, to be performed and then applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    /// Generation token; only the latest issued one can be applied.
    pub generation: FetchGeneration,
    /// The map center the fetch was issued for.
    pub center: Coordinate,
}

/// What happened when a fetch result was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The incident list was replaced and the refetch baseline advanced.
    Applied {
        /// Number of incidents now displayed.
        count: usize,
    },
    /// A newer fetch was issued in the meantime; this response was
    /// discarded and nothing changed.
    Stale,
    /// The fetch failed. The prior incident list, selection, and refetch
    /// baseline are untouched; the message is a user-visible notification.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

/// Coordinates one user's map view over an incident source.
pub struct MapSession<S: IncidentSource> {
    tracker: ViewportTracker,
    store: SelectionStore,
    source: S,
}

impl<S: IncidentSource> MapSession<S> {
    /// Creates a session at the tracker's default camera position.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            tracker: ViewportTracker::default(),
            store: SelectionStore::new(),
            source,
        }
    }

    /// Creates a session with a custom tracker (camera position or
    /// threshold).
    #[must_use]
    pub const fn with_tracker(source: S, tracker: ViewportTracker) -> Self {
        Self {
            tracker,
            store: SelectionStore::new(),
            source,
        }
    }

    /// The viewport tracker (camera state and refetch baseline).
    #[must_use]
    pub const fn tracker(&self) -> &ViewportTracker {
        &self.tracker
    }

    /// The selection store (incidents, markers, selection).
    #[must_use]
    pub const fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Mutable access to the selection store for selection and marker
    /// operations (select, add, delete, drag). Incident-list replacement
    /// goes through [`Self::apply`] only.
    pub const fn store_mut(&mut self) -> &mut SelectionStore {
        &mut self.store
    }

    /// The initialization-driven fetch that seeds the refetch baseline.
    pub fn initial_fetch(&mut self) -> FetchRequest {
        self.issue(self.tracker.center())
    }

    /// Handles a camera-change notification. Returns a fetch request only
    /// when the viewport crossed the distance threshold.
    pub fn on_camera_changed(&mut self, center: Coordinate, zoom: u8) -> Option<FetchRequest> {
        match self.tracker.on_camera_changed(center, zoom) {
            CameraDecision::Refetch => Some(self.issue(center)),
            CameraDecision::Hold => None,
        }
    }

    /// Handles a place selection. Always fetches.
    pub fn on_place_selected(&mut self, center: Coordinate, zoom: u8) -> FetchRequest {
        self.tracker.on_place_selected(center, zoom);
        self.issue(center)
    }

    /// Handles a jump to the user's own location. Always fetches.
    pub fn on_focus_user_location(&mut self, center: Coordinate) -> FetchRequest {
        self.tracker.on_focus_user_location(center);
        self.issue(center)
    }

    /// Performs `request` against the collaborator and applies the result.
    pub async fn perform(&mut self, request: FetchRequest) -> FetchOutcome {
        let result = self.source.fetch_incidents(request.center).await;
        self.apply(request, result)
    }

    /// Applies a completed fetch.
    ///
    /// Success replaces the incident list and advances the baseline only
    /// when `request` is still the latest issued fetch. Failure leaves all
    /// prior state intact; it is surfaced, not retried.
    pub fn apply(
        &mut self,
        request: FetchRequest,
        result: Result<Vec<Incident>, IncidentError>,
    ) -> FetchOutcome {
        match result {
            Ok(incidents) => {
                if self.tracker.complete_fetch(request.generation) {
                    let count = incidents.len();
                    self.store.replace_incidents(incidents);
                    log::debug!("Applied {count} incidents for {}", request.center);
                    FetchOutcome::Applied { count }
                } else {
                    FetchOutcome::Stale
                }
            }
            Err(e) => {
                self.tracker.fail_fetch(request.generation);
                log::warn!("Incident fetch for {} failed: {e}", request.center);
                FetchOutcome::Failed {
                    message: format!("Could not load incidents: {e}"),
                }
            }
        }
    }

    fn issue(&mut self, center: Coordinate) -> FetchRequest {
        FetchRequest {
            generation: self.tracker.begin_fetch(center),
            center,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use map_marks_incident_models::{EventType, MarkerDraft};

    use super::*;

    /// Kilometres per degree of latitude on the spherical Earth model.
    const KM_PER_DEGREE_LAT: f64 =
        std::f64::consts::PI * map_marks_geo_models::EARTH_RADIUS_KM / 180.0;

    fn north_of(origin: Coordinate, km: f64) -> Coordinate {
        Coordinate::new(origin.latitude + km / KM_PER_DEGREE_LAT, origin.longitude)
    }

    fn incident(url: &str) -> Incident {
        Incident {
            title: format!("incident {url}"),
            image_url: "https://placehold.co/600x400.png".to_string(),
            location: Coordinate::new(17.0544, 79.2671),
            comments: Vec::new(),
            description: None,
            likes_count: None,
            dislikes_count: None,
            location_name: None,
            source: None,
            url: Some(url.to_string()),
        }
    }

    /// Source serving a scripted sequence of responses and recording every
    /// requested center.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<Incident>, IncidentError>>>,
        calls: Mutex<Vec<Coordinate>>,
    }

    impl ScriptedSource {
        fn push_ok(&self, incidents: Vec<Incident>) {
            self.responses.lock().unwrap().push_back(Ok(incidents));
        }

        fn push_err(&self) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(IncidentError::Status { status: 503 }));
        }
    }

    #[async_trait::async_trait]
    impl<'a> IncidentSource for &'a ScriptedSource {
        async fn fetch_incidents(
            &self,
            center: Coordinate,
        ) -> Result<Vec<Incident>, IncidentError> {
            self.calls.lock().unwrap().push(center);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted fetch")
        }
    }

    /// Session with a completed initial fetch at `origin`.
    async fn session_with_baseline(
        source: &ScriptedSource,
        origin: Coordinate,
    ) -> MapSession<&ScriptedSource> {
        source.push_ok(vec![incident("https://x.com/post/201")]);
        let mut session =
            MapSession::with_tracker(source, map_marks_viewport::ViewportTracker::new(origin, 18));
        let request = session.initial_fetch();
        assert_eq!(session.perform(request).await, FetchOutcome::Applied { count: 1 });
        session
    }

    #[tokio::test]
    async fn threshold_crossing_issues_exactly_one_fetch() {
        let source = ScriptedSource::default();
        let origin = Coordinate::new(17.0544, 79.2671);
        let mut session = session_with_baseline(&source, origin).await;

        let moved = north_of(origin, 17.0);
        source.push_ok(vec![
            incident("https://x.com/post/202"),
            incident("https://x.com/post/203"),
        ]);

        let request = session.on_camera_changed(moved, 18).expect("should refetch");
        assert_eq!(request.center, moved);
        assert_eq!(
            session.perform(request).await,
            FetchOutcome::Applied { count: 2 }
        );

        assert_eq!(session.tracker().last_fetch_center(), Some(moved));
        assert_eq!(source.calls.lock().unwrap().len(), 2, "initial + one refetch");
    }

    #[tokio::test]
    async fn sub_threshold_movement_fetches_nothing() {
        let source = ScriptedSource::default();
        let origin = Coordinate::new(17.0544, 79.2671);
        let mut session = session_with_baseline(&source, origin).await;

        let moved = north_of(origin, 10.0);
        assert!(session.on_camera_changed(moved, 18).is_none());
        assert_eq!(source.calls.lock().unwrap().len(), 1, "initial fetch only");
    }

    #[tokio::test]
    async fn failed_fetch_leaves_prior_state_intact() {
        let source = ScriptedSource::default();
        let origin = Coordinate::new(17.0544, 79.2671);
        let mut session = session_with_baseline(&source, origin).await;
        session.store_mut().select("https://x.com/post/201");

        let moved = north_of(origin, 17.0);
        source.push_err();

        let request = session.on_camera_changed(moved, 18).expect("should refetch");
        let outcome = session.perform(request).await;
        assert!(matches!(outcome, FetchOutcome::Failed { .. }));

        assert_eq!(session.store().incidents().len(), 1);
        assert!(session.store().selected_incident().is_some());
        assert_eq!(
            session.tracker().last_fetch_center(),
            Some(origin),
            "baseline stays at the last success, enabling a later retry"
        );
    }

    #[tokio::test]
    async fn stale_completion_is_discarded_in_favor_of_latest() {
        let source = ScriptedSource::default();
        let origin = Coordinate::new(17.0544, 79.2671);
        let mut session = session_with_baseline(&source, origin).await;

        let first_target = north_of(origin, 17.0);
        let second_target = north_of(origin, 40.0);

        let first = session.on_camera_changed(first_target, 18).unwrap();
        let second = session.on_camera_changed(second_target, 18).unwrap();

        // The slow first fetch resolves after the second was issued:
        // last-issued-wins, so its payload must not be applied.
        let stale = session.apply(first, Ok(vec![incident("https://x.com/stale")]));
        assert_eq!(stale, FetchOutcome::Stale);
        assert_eq!(
            session.store().incidents()[0].url.as_deref(),
            Some("https://x.com/post/201")
        );

        let fresh = session.apply(second, Ok(vec![incident("https://x.com/fresh")]));
        assert_eq!(fresh, FetchOutcome::Applied { count: 1 });
        assert_eq!(session.tracker().last_fetch_center(), Some(second_target));
    }

    #[tokio::test]
    async fn place_selection_fetches_regardless_of_distance() {
        let source = ScriptedSource::default();
        let origin = Coordinate::new(17.0544, 79.2671);
        let mut session = session_with_baseline(&source, origin).await;

        // 1 km away: far below the threshold, but an explicit jump.
        let nearby = north_of(origin, 1.0);
        source.push_ok(Vec::new());

        let request = session.on_place_selected(nearby, 15);
        assert_eq!(session.perform(request).await, FetchOutcome::Applied { count: 0 });
        assert_eq!(session.tracker().zoom(), 15);
    }

    #[tokio::test]
    async fn refresh_clears_dangling_selection_through_the_session() {
        let source = ScriptedSource::default();
        let origin = Coordinate::new(17.0544, 79.2671);
        let mut session = session_with_baseline(&source, origin).await;
        session.store_mut().select("https://x.com/post/201");

        source.push_ok(vec![incident("https://x.com/post/999")]);
        let request = session.on_focus_user_location(north_of(origin, 2.0));
        session.perform(request).await;

        assert!(session.store().selected_id().is_none());
    }

    #[tokio::test]
    async fn marker_lifecycle_is_independent_of_fetching() {
        let source = ScriptedSource::default();
        let origin = Coordinate::new(17.0544, 79.2671);
        let mut session = session_with_baseline(&source, origin).await;

        let id = session.store_mut().add_marker(MarkerDraft {
            lat: origin.latitude,
            lng: origin.longitude,
            event_type: EventType::PowerOutage,
            description: "Outage near the market".to_string(),
        });
        session.store_mut().select(id.clone());
        session
            .store_mut()
            .drag_end(&id, Coordinate::new(17.06, 79.27));

        let marker = session.store().selected_marker().unwrap();
        assert!((marker.lat - 17.06).abs() < f64::EPSILON);

        session.store_mut().delete_marker(&id);
        assert!(session.store().selected_id().is_none());
        assert_eq!(source.calls.lock().unwrap().len(), 1, "no fetch issued");
    }
}
