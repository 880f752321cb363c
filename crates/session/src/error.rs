use crate::mode::InteractionMode;
use crate::validator::ValidationError;
use foundation::ObstacleId;

/// The single user-visible message line of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Validation(ValidationError),
    /// A well-formed planner response without a path.
    NoRouteFound,
    RouteRequestFailed,
    LocationNotFound,
    ObstaclesSaveFailed,
    ObstaclesLoadFailed,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alert::Validation(err) => write!(f, "{err}"),
            Alert::NoRouteFound => {
                write!(f, "No route found. Increase search area and try again.")
            }
            Alert::RouteRequestFailed => {
                write!(f, "Failed to get a route. Check the server and try again.")
            }
            Alert::LocationNotFound => write!(f, "Location not found in Ukraine."),
            Alert::ObstaclesSaveFailed => write!(f, "Failed to save obstacles."),
            Alert::ObstaclesLoadFailed => write!(f, "Failed to load obstacles."),
        }
    }
}

/// An operation was invoked while its guard was unmet.
///
/// The interactive layer disables the triggering control in these cases;
/// reaching one means the caller broke the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionViolation {
    MarkerCount {
        expected: usize,
        actual: usize,
    },
    WrongMode {
        required: InteractionMode,
        actual: InteractionMode,
    },
    /// Both route markers are already placed.
    MarkersFull,
    /// The route for the current inputs has already been planned.
    RouteAlreadyCurrent,
    /// A request for the same resource is still outstanding.
    RequestInFlight,
    EmptyInput,
    NotLoaded,
    UnknownObstacle(ObstacleId),
}

impl std::fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreconditionViolation::MarkerCount { expected, actual } => {
                write!(f, "expected {expected} markers, found {actual}")
            }
            PreconditionViolation::WrongMode { required, actual } => {
                write!(f, "requires {required} mode, session is in {actual} mode")
            }
            PreconditionViolation::MarkersFull => write!(f, "both markers are already placed"),
            PreconditionViolation::RouteAlreadyCurrent => {
                write!(f, "route is already planned for the current markers")
            }
            PreconditionViolation::RequestInFlight => {
                write!(f, "a request is already in flight")
            }
            PreconditionViolation::EmptyInput => write!(f, "latitude and longitude are required"),
            PreconditionViolation::NotLoaded => write!(f, "obstacles are not loaded"),
            PreconditionViolation::UnknownObstacle(id) => write!(f, "unknown obstacle #{id}"),
        }
    }
}

impl std::error::Error for PreconditionViolation {}
