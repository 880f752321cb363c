use foundation::LatLon;
use tracing::debug;

use crate::error::{Alert, PreconditionViolation};
use crate::handle::SessionHandle;
use crate::markers::MarkerRole;
use crate::mode::InteractionMode;
use crate::planning::{Algorithm, SearchMargin};
use crate::validator::ValidationError;

/// What a single map click did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ClickOutcome {
    MarkerPlaced(MarkerRole),
    ObstaclePlaced,
    /// Routing mode with both markers already placed.
    IgnoredMarkersFull,
    /// Obstacle mode while a save is outstanding; the server's reply will
    /// replace the list.
    IgnoredSaveInFlight,
    /// Outside the service region; the session alert names the axis.
    Rejected(ValidationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedMarkerError {
    Precondition(PreconditionViolation),
    Invalid(ValidationError),
}

impl std::fmt::Display for TypedMarkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedMarkerError::Precondition(p) => write!(f, "cannot add marker: {p}"),
            TypedMarkerError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TypedMarkerError {}

/// Turns map clicks and toolbar actions into session mutations.
#[derive(Debug, Clone)]
pub struct MapInteractionController {
    session: SessionHandle,
}

impl MapInteractionController {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Applies a click at `coord` according to the current mode.
    pub fn on_map_click(&self, coord: LatLon) -> ClickOutcome {
        self.session.update(|s| {
            if s.mode() == InteractionMode::Routing && s.markers().is_full() {
                return ClickOutcome::IgnoredMarkersFull;
            }
            if s.mode().is_obstacle_editing() && s.in_flight().obstacles {
                return ClickOutcome::IgnoredSaveInFlight;
            }

            let point = match s.validate(coord.lat, coord.lon) {
                Ok(point) => point,
                Err(err) => {
                    debug!(%coord, %err, "map click rejected");
                    s.set_alert(Alert::Validation(err));
                    return ClickOutcome::Rejected(err);
                }
            };
            s.clear_alert();

            match s.mode() {
                InteractionMode::Routing => match s.push_marker(point) {
                    Some(role) => {
                        debug!(%point, ?role, "marker placed");
                        ClickOutcome::MarkerPlaced(role)
                    }
                    None => ClickOutcome::IgnoredMarkersFull,
                },
                InteractionMode::ObstacleEditing => {
                    s.push_obstacle(point);
                    debug!(%point, total = s.obstacles().len(), "obstacle drawn");
                    ClickOutcome::ObstaclePlaced
                }
            }
        })
    }

    /// Removes the marker at `index` (clicking an existing marker). The route
    /// is cleared along with it.
    pub fn remove_marker(&self, index: usize) -> Option<LatLon> {
        self.session.update(|s| {
            let removed = s.remove_marker(index)?;
            debug!(%removed, index, "marker removed, route cleared");
            Some(removed)
        })
    }

    /// Adds a marker from the typed latitude/longitude fields and clears them.
    pub fn add_typed_marker(&self) -> Result<MarkerRole, TypedMarkerError> {
        self.session.update(|s| {
            if s.mode() != InteractionMode::Routing {
                return Err(TypedMarkerError::Precondition(
                    PreconditionViolation::WrongMode {
                        required: InteractionMode::Routing,
                        actual: s.mode(),
                    },
                ));
            }
            if s.markers().is_full() {
                return Err(TypedMarkerError::Precondition(
                    PreconditionViolation::MarkersFull,
                ));
            }
            if !s.can_add_typed_marker() {
                return Err(TypedMarkerError::Precondition(
                    PreconditionViolation::EmptyInput,
                ));
            }

            let point = match s.validate_typed() {
                Ok(point) => point,
                Err(err) => {
                    s.set_alert(Alert::Validation(err));
                    return Err(TypedMarkerError::Invalid(err));
                }
            };
            s.clear_alert();
            let role = s.push_marker(point).ok_or(TypedMarkerError::Precondition(
                PreconditionViolation::MarkersFull,
            ))?;
            s.clear_typed_coordinates();
            Ok(role)
        })
    }

    /// "Add blockade": subsequent clicks draw obstacles.
    pub fn enter_obstacle_mode(&self) {
        self.set_mode(InteractionMode::ObstacleEditing);
    }

    pub fn set_mode(&self, mode: InteractionMode) {
        self.session.update(|s| s.set_mode(mode));
    }

    pub fn set_margin(&self, margin: SearchMargin) {
        self.session.update(|s| s.set_margin(margin));
    }

    pub fn set_algorithm(&self, algorithm: Algorithm) {
        self.session.update(|s| s.set_algorithm(algorithm));
    }
}
