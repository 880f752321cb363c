use std::sync::Arc;

use foundation::LatLon;
use session::{
    Algorithm, Alert, InteractionMode, MAX_MARKERS, MarkerSet, PreconditionViolation, Route,
    RouteStatus, SearchMargin, SessionHandle, SessionState,
};
use tracing::{debug, info, warn};

use crate::error::RequestError;
use crate::inflight::InFlightGuard;
use crate::protocol::{RouteRequest, RouteResponse};
use crate::service::{PlannerService, ServiceError};

/// Builds the `/route` body. Exactly two markers are required.
pub fn build_route_request(
    markers: &MarkerSet,
    margin: SearchMargin,
    algorithm: Algorithm,
) -> Result<RouteRequest, PreconditionViolation> {
    let (start, end) = markers.pair().ok_or(PreconditionViolation::MarkerCount {
        expected: MAX_MARKERS,
        actual: markers.len(),
    })?;
    Ok(RouteRequest {
        start,
        end,
        margin: margin.get(),
        algorithm,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The route and bounding box were replaced.
    Planned { points: usize, length_m: f64 },
    /// The planner found no path; the previous route is kept.
    NoRouteFound,
    /// The markers changed while the request was outstanding; the response
    /// was dropped.
    Superseded,
}

/// Issues route requests for a session and applies the responses.
///
/// At most one request is outstanding per session; a second call while one
/// is in flight is rejected, not queued.
pub struct RouteRequestOrchestrator {
    session: SessionHandle,
    service: Arc<dyn PlannerService>,
}

impl RouteRequestOrchestrator {
    pub fn new(session: SessionHandle, service: Arc<dyn PlannerService>) -> Self {
        Self { session, service }
    }

    pub async fn request_route(&self) -> Result<RouteOutcome, RequestError> {
        let (request, revision) = self.session.update(begin)?;
        let _guard = InFlightGuard::route(&self.session);

        info!(
            start = %request.start,
            end = %request.end,
            margin = request.margin,
            algorithm = %request.algorithm,
            "requesting route"
        );
        let response = self.service.plan_route(request.clone()).await;

        self.session
            .update(|s| apply(s, &request, revision, response))
            .map_err(RequestError::from)
    }
}

/// Checks the guards and marks the request in flight.
fn begin(s: &mut SessionState) -> Result<(RouteRequest, u64), PreconditionViolation> {
    if s.in_flight().route {
        return Err(PreconditionViolation::RequestInFlight);
    }
    let request = build_route_request(s.markers(), s.margin(), s.algorithm())?;
    if !s.can_request_route() {
        return Err(match s.route_status() {
            RouteStatus::Outdated => PreconditionViolation::WrongMode {
                required: InteractionMode::Routing,
                actual: s.mode(),
            },
            RouteStatus::Current | RouteStatus::None => PreconditionViolation::RouteAlreadyCurrent,
        });
    }
    s.set_route_in_flight(true);
    Ok((request, s.revision()))
}

fn apply(
    s: &mut SessionState,
    request: &RouteRequest,
    revision: u64,
    response: Result<RouteResponse, ServiceError>,
) -> Result<RouteOutcome, ServiceError> {
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "route request failed");
            s.set_alert(Alert::RouteRequestFailed);
            return Err(err);
        }
    };

    let requested: (LatLon, LatLon) = (request.start, request.end);
    if s.markers().pair() != Some(requested) {
        debug!("markers changed while routing, dropping response");
        return Ok(RouteOutcome::Superseded);
    }

    if response.route.is_empty() {
        info!("planner found no route");
        s.set_alert(Alert::NoRouteFound);
        return Ok(RouteOutcome::NoRouteFound);
    }

    let bounding_box = response.bounding_box.as_ref().and_then(|b| b.to_rect());
    let route = Route::new(response.route, bounding_box, revision);
    let outcome = RouteOutcome::Planned {
        points: route.len(),
        length_m: route.length_m(),
    };
    info!(points = route.len(), length_m = route.length_m(), "route planned");
    s.set_route(route);
    s.clear_alert();
    Ok(outcome)
}
