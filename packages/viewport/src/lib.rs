#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Viewport tracking and the proximity-gated refetch policy.
//!
//! The [`ViewportTracker`] owns the current map center/zoom and the center
//! of the last *successful* incident fetch. On every camera-change event it
//! decides whether the viewport has moved far enough to warrant refetching
//! incident data, so that minor pans and zooms do not trigger redundant
//! network calls.
//!
//! Fetches are identified by a monotonically increasing
//! [`FetchGeneration`]. Only the latest issued generation may be applied
//! (last-issued-wins): a stale, slow-to-resolve fetch can never overwrite a
//! newer, faster one, and only a successful completion advances the
//! threshold baseline.

use map_marks_geo_models::Coordinate;

/// Minimum travel distance, in kilometres, before camera movement triggers
/// an incident refetch.
///
/// The canonical threshold is the literal 16 km constant (not the
/// miles-derived 16.09 km seen in some revisions).
pub const FETCH_THRESHOLD_KM: f64 = 16.0;

/// Initial map center before the user's location resolves (New York City).
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(40.7128, -74.0060);

/// Initial zoom level.
pub const DEFAULT_ZOOM: u8 = 18;

/// Identifier for one issued fetch. Strictly increasing per tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchGeneration(u64);

/// What a camera event asks of the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraDecision {
    /// The viewport moved, but not far enough to refetch.
    Hold,
    /// The viewport moved past the threshold (or jumped): refetch.
    Refetch,
}

/// Owns the map camera state and the refetch baseline.
#[derive(Debug)]
pub struct ViewportTracker {
    center: Coordinate,
    zoom: u8,
    last_fetch_center: Option<Coordinate>,
    threshold_km: f64,
    next_generation: u64,
    /// Latest issued fetch and the center it was issued for.
    inflight: Option<(FetchGeneration, Coordinate)>,
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl ViewportTracker {
    /// Creates a tracker at the given camera position with the canonical
    /// [`FETCH_THRESHOLD_KM`].
    #[must_use]
    pub const fn new(center: Coordinate, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            last_fetch_center: None,
            threshold_km: FETCH_THRESHOLD_KM,
            next_generation: 0,
            inflight: None,
        }
    }

    /// Overrides the refetch threshold.
    #[must_use]
    pub const fn with_threshold_km(mut self, threshold_km: f64) -> Self {
        self.threshold_km = threshold_km;
        self
    }

    /// Current camera center.
    #[must_use]
    pub const fn center(&self) -> Coordinate {
        self.center
    }

    /// Current zoom level.
    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Center of the last successful fetch, if any fetch has completed.
    #[must_use]
    pub const fn last_fetch_center(&self) -> Option<Coordinate> {
        self.last_fetch_center
    }

    /// Handles a camera-change notification.
    ///
    /// Unconditionally updates the tracked center and zoom. Signals a
    /// refetch only when a fetch has previously succeeded and the camera
    /// has travelled more than the threshold from that fetch's center.
    /// Before the first successful fetch, camera movement alone never
    /// refetches; the initial load is driven by initialization.
    pub fn on_camera_changed(&mut self, center: Coordinate, zoom: u8) -> CameraDecision {
        self.center = center;
        self.zoom = zoom;

        match self.last_fetch_center {
            Some(baseline) if baseline.distance_km(&center) > self.threshold_km => {
                CameraDecision::Refetch
            }
            _ => CameraDecision::Hold,
        }
    }

    /// Handles a place selection from the search box.
    ///
    /// An explicit jump, not incremental drift: re-centers, re-zooms, and
    /// always refetches regardless of distance.
    pub fn on_place_selected(&mut self, center: Coordinate, zoom: u8) -> CameraDecision {
        self.center = center;
        self.zoom = zoom;
        CameraDecision::Refetch
    }

    /// Handles a jump to the user's own location. Always refetches.
    pub fn on_focus_user_location(&mut self, center: Coordinate) -> CameraDecision {
        self.center = center;
        CameraDecision::Refetch
    }

    /// Registers a fetch for `center` and returns its generation.
    ///
    /// Issuing a new fetch supersedes any outstanding one: the older
    /// generation can no longer be applied.
    pub fn begin_fetch(&mut self, center: Coordinate) -> FetchGeneration {
        self.next_generation += 1;
        let generation = FetchGeneration(self.next_generation);
        self.inflight = Some((generation, center));
        generation
    }

    /// Records a successful completion of `generation`.
    ///
    /// Returns `true` when this was the latest issued fetch: the baseline
    /// advances to that fetch's center and the response should be applied.
    /// Returns `false` for a stale generation; the response must be
    /// discarded and the baseline is untouched.
    pub fn complete_fetch(&mut self, generation: FetchGeneration) -> bool {
        match self.inflight {
            Some((latest, center)) if latest == generation => {
                self.last_fetch_center = Some(center);
                self.inflight = None;
                true
            }
            _ => {
                log::debug!("Discarding stale fetch completion ({generation:?})");
                false
            }
        }
    }

    /// Records a failed fetch.
    ///
    /// The baseline stays at its last successful value, so the next camera
    /// movement past the threshold naturally retries.
    pub fn fail_fetch(&mut self, generation: FetchGeneration) {
        if let Some((latest, _)) = self.inflight
            && latest == generation
        {
            self.inflight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Kilometres per degree of latitude on the spherical Earth model.
    const KM_PER_DEGREE_LAT: f64 =
        std::f64::consts::PI * map_marks_geo_models::EARTH_RADIUS_KM / 180.0;

    fn north_of(origin: Coordinate, km: f64) -> Coordinate {
        Coordinate::new(origin.latitude + km / KM_PER_DEGREE_LAT, origin.longitude)
    }

    /// Puts the tracker into the "one successful fetch at `center`" state.
    fn tracker_with_baseline(center: Coordinate) -> ViewportTracker {
        let mut tracker = ViewportTracker::new(center, DEFAULT_ZOOM);
        let generation = tracker.begin_fetch(center);
        assert!(tracker.complete_fetch(generation));
        tracker
    }

    #[test]
    fn camera_movement_without_baseline_never_refetches() {
        let mut tracker = ViewportTracker::default();
        let far = Coordinate::new(17.0544, 79.2671);
        assert_eq!(tracker.on_camera_changed(far, 12), CameraDecision::Hold);
        assert_eq!(tracker.center(), far);
        assert_eq!(tracker.zoom(), 12);
        assert!(tracker.last_fetch_center().is_none());
    }

    #[test]
    fn refetches_past_threshold_along_meridian() {
        let baseline = Coordinate::new(17.0544, 79.2671);
        let mut tracker = tracker_with_baseline(baseline);

        let moved = north_of(baseline, 20.0);
        assert_eq!(
            tracker.on_camera_changed(moved, DEFAULT_ZOOM),
            CameraDecision::Refetch
        );
    }

    #[test]
    fn holds_when_threshold_raised_above_distance() {
        let baseline = Coordinate::new(17.0544, 79.2671);
        let mut tracker = ViewportTracker::new(baseline, DEFAULT_ZOOM).with_threshold_km(25.0);
        let generation = tracker.begin_fetch(baseline);
        assert!(tracker.complete_fetch(generation));

        let moved = north_of(baseline, 20.0);
        assert_eq!(
            tracker.on_camera_changed(moved, DEFAULT_ZOOM),
            CameraDecision::Hold
        );
    }

    #[test]
    fn small_movements_do_not_reset_the_baseline() {
        let baseline = Coordinate::new(17.0544, 79.2671);
        let mut tracker = tracker_with_baseline(baseline);

        // Ten 2.5 km pans; each is under the threshold individually but
        // the seventh reaches 17.5 km cumulative distance from the
        // baseline, which never moved in between.
        let mut decisions = Vec::new();
        for step in 1..=10 {
            let moved = north_of(baseline, 2.5 * f64::from(step));
            decisions.push(tracker.on_camera_changed(moved, DEFAULT_ZOOM));
        }

        let refetch_at = decisions
            .iter()
            .position(|d| *d == CameraDecision::Refetch)
            .unwrap();
        assert_eq!(
            refetch_at, 6,
            "first refetch should be at 17.5 km cumulative"
        );
    }

    #[test]
    fn place_selection_and_focus_always_refetch() {
        let mut tracker = ViewportTracker::default();
        let place = Coordinate::new(40.7128, -74.0060);

        assert_eq!(
            tracker.on_place_selected(place, 15),
            CameraDecision::Refetch
        );
        assert_eq!(tracker.zoom(), 15);
        assert_eq!(
            tracker.on_focus_user_location(place),
            CameraDecision::Refetch
        );
    }

    #[test]
    fn baseline_advances_only_on_completion() {
        let a = Coordinate::new(17.0544, 79.2671);
        let b = north_of(a, 17.0);

        let mut tracker = ViewportTracker::new(a, DEFAULT_ZOOM);
        let generation = tracker.begin_fetch(a);
        assert!(tracker.last_fetch_center().is_none());
        assert!(tracker.complete_fetch(generation));
        assert_eq!(tracker.last_fetch_center(), Some(a));

        let generation = tracker.begin_fetch(b);
        tracker.fail_fetch(generation);
        assert_eq!(
            tracker.last_fetch_center(),
            Some(a),
            "failure must leave the baseline at the last success"
        );
    }

    #[test]
    fn stale_completion_is_discarded() {
        let a = Coordinate::new(17.0544, 79.2671);
        let b = north_of(a, 40.0);

        let mut tracker = ViewportTracker::new(a, DEFAULT_ZOOM);
        let first = tracker.begin_fetch(a);
        let second = tracker.begin_fetch(b);

        // The slow first fetch resolves after the second was issued.
        assert!(!tracker.complete_fetch(first));
        assert!(tracker.last_fetch_center().is_none());

        assert!(tracker.complete_fetch(second));
        assert_eq!(tracker.last_fetch_center(), Some(b));
    }

    #[test]
    fn failed_stale_fetch_keeps_latest_applicable() {
        let a = Coordinate::new(17.0544, 79.2671);
        let b = north_of(a, 40.0);

        let mut tracker = ViewportTracker::new(a, DEFAULT_ZOOM);
        let first = tracker.begin_fetch(a);
        let second = tracker.begin_fetch(b);

        tracker.fail_fetch(first);
        assert!(tracker.complete_fetch(second));
        assert_eq!(tracker.last_fetch_center(), Some(b));
    }
}
