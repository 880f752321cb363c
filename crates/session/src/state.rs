use foundation::{GeoRect, LatLon};
use tracing::debug;

use crate::error::Alert;
use crate::markers::{MAX_MARKERS, MarkerRole, MarkerSet};
use crate::mode::InteractionMode;
use crate::obstacles::Obstacle;
use crate::planning::{Algorithm, SearchMargin};
use crate::route::{Route, RouteStatus};
use crate::validator::{CoordinateValidator, ValidationError};

/// Zoom used for the initial view and for geocoder hits.
pub const DEFAULT_ZOOM: u8 = 13;

/// Map view the presentation layer should show.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        // Lviv.
        Self {
            center: LatLon::new(49.8397, 24.0297),
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Outstanding network requests, at most one per resource.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct InFlight {
    pub route: bool,
    pub obstacles: bool,
}

/// Whether a route request may be issued.
///
/// Requires exactly two markers. A fresh pair (no route yet) is always
/// eligible; an outdated route may be re-planned unless the user is still
/// drawing obstacles; a current route may not.
pub fn route_request_enabled(marker_count: usize, route: RouteStatus, mode: InteractionMode) -> bool {
    if marker_count != MAX_MARKERS {
        return false;
    }
    match route {
        RouteStatus::None => true,
        RouteStatus::Outdated => !mode.is_obstacle_editing(),
        RouteStatus::Current => false,
    }
}

/// Everything one planning session knows.
///
/// `revision` advances on every marker, mode, margin or algorithm mutation.
/// A route records the revision it was planned for, which is all the
/// request-enabled condition needs; no separate flag is kept.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    validator: CoordinateValidator,
    mode: InteractionMode,
    markers: MarkerSet,
    obstacles: Vec<Obstacle>,
    route: Route,
    search_query: String,
    latitude_text: String,
    longitude_text: String,
    margin: SearchMargin,
    algorithm: Algorithm,
    viewport: Viewport,
    alert: Option<Alert>,
    in_flight: InFlight,
    revision: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(validator: CoordinateValidator) -> Self {
        Self {
            validator,
            ..Self::default()
        }
    }

    pub fn validator(&self) -> &CoordinateValidator {
        &self.validator
    }

    pub fn validate(&self, lat: f64, lon: f64) -> Result<LatLon, ValidationError> {
        self.validator.validate(lat, lon)
    }

    /// Validates whatever is currently typed in the latitude/longitude fields.
    pub fn validate_typed(&self) -> Result<LatLon, ValidationError> {
        self.validator
            .validate_text(&self.latitude_text, &self.longitude_text)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    // Mode

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode == mode {
            return;
        }
        debug!(from = %self.mode, to = %mode, "interaction mode changed");
        self.mode = mode;
        self.bump();
    }

    // Markers

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Appends a marker; returns `None` when two are already placed. Any
    /// marker change discards the route.
    pub fn push_marker(&mut self, point: LatLon) -> Option<MarkerRole> {
        let role = self.markers.push(point)?;
        self.clear_route();
        self.bump();
        Some(role)
    }

    pub fn remove_marker(&mut self, index: usize) -> Option<LatLon> {
        let removed = self.markers.remove(index)?;
        self.clear_route();
        self.bump();
        Some(removed)
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.clear_route();
        self.bump();
    }

    // Obstacles

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn push_obstacle(&mut self, position: LatLon) {
        self.obstacles.push(Obstacle::drawn(position));
    }

    pub fn replace_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    // Route

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn bounding_box(&self) -> Option<GeoRect> {
        self.route.bounding_box()
    }

    pub fn set_route(&mut self, route: Route) {
        self.route = route;
    }

    pub fn clear_route(&mut self) {
        self.route = Route::default();
    }

    pub fn route_status(&self) -> RouteStatus {
        if self.route.is_empty() {
            RouteStatus::None
        } else if self.route.revision() == self.revision {
            RouteStatus::Current
        } else {
            RouteStatus::Outdated
        }
    }

    /// Derived on every call; see [`route_request_enabled`].
    pub fn can_request_route(&self) -> bool {
        !self.in_flight.route
            && route_request_enabled(self.markers.len(), self.route_status(), self.mode)
    }

    // Planner settings

    pub fn margin(&self) -> SearchMargin {
        self.margin
    }

    pub fn set_margin(&mut self, margin: SearchMargin) {
        if self.margin != margin {
            self.margin = margin;
            self.bump();
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        if self.algorithm != algorithm {
            self.algorithm = algorithm;
            self.bump();
        }
    }

    // Form fields

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn latitude_text(&self) -> &str {
        &self.latitude_text
    }

    pub fn set_latitude_text(&mut self, text: impl Into<String>) {
        self.latitude_text = text.into();
    }

    pub fn longitude_text(&self) -> &str {
        &self.longitude_text
    }

    pub fn set_longitude_text(&mut self, text: impl Into<String>) {
        self.longitude_text = text.into();
    }

    pub fn clear_typed_coordinates(&mut self) {
        self.latitude_text.clear();
        self.longitude_text.clear();
    }

    /// "Add marker" is offered only while routing, with both fields filled
    /// and a free marker slot.
    pub fn can_add_typed_marker(&self) -> bool {
        self.mode == InteractionMode::Routing
            && !self.markers.is_full()
            && !self.latitude_text.trim().is_empty()
            && !self.longitude_text.trim().is_empty()
    }

    pub fn can_save_obstacles(&self) -> bool {
        self.mode.is_obstacle_editing() && !self.in_flight.obstacles
    }

    // View

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // Alerts

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn alert_message(&self) -> Option<String> {
        self.alert.as_ref().map(ToString::to_string)
    }

    pub fn set_alert(&mut self, alert: Alert) {
        debug!(%alert, "alert raised");
        self.alert = Some(alert);
    }

    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    // In-flight requests

    pub fn in_flight(&self) -> InFlight {
        self.in_flight
    }

    pub fn set_route_in_flight(&mut self, pending: bool) {
        self.in_flight.route = pending;
    }

    pub fn set_obstacles_in_flight(&mut self, pending: bool) {
        self.in_flight.obstacles = pending;
    }
}
