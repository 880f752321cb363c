use std::sync::Arc;

use foundation::LatLon;
use session::{
    Alert, InteractionMode, Obstacle, PreconditionViolation, SessionHandle, SessionState,
};
use tracing::{info, warn};

use crate::error::RequestError;
use crate::inflight::InFlightGuard;
use crate::protocol::ObstaclesRequest;
use crate::service::PlannerService;

/// Collects obstacles drawn in obstacle-editing mode and synchronizes them
/// with the planning service.
pub struct ObstacleEditor {
    session: SessionHandle,
    service: Arc<dyn PlannerService>,
}

impl ObstacleEditor {
    pub fn new(session: SessionHandle, service: Arc<dyn PlannerService>) -> Self {
        Self { session, service }
    }

    /// Appends a locally drawn obstacle. The position is expected to be
    /// validated already.
    pub fn add_obstacle(&self, position: LatLon) -> Result<(), PreconditionViolation> {
        self.session.update(|s| {
            require_editing(s)?;
            if s.in_flight().obstacles {
                return Err(PreconditionViolation::RequestInFlight);
            }
            s.push_obstacle(position);
            Ok(())
        })
    }

    /// Sends the full local list in one request. On success the server's
    /// list replaces the local one and the session returns to routing.
    pub async fn save_obstacles(&self) -> Result<usize, RequestError> {
        let request = self.session.update(|s| {
            require_editing(s)?;
            begin(s)?;
            let points = s.obstacles().iter().map(|o| o.position).collect();
            Ok::<_, PreconditionViolation>(ObstaclesRequest::save(points))
        })?;
        let _guard = InFlightGuard::obstacles(&self.session);

        let sent = request.obstacles.as_ref().map_or(0, Vec::len);
        info!(count = sent, "saving obstacles");
        match self.service.sync_obstacles(request).await {
            Ok(response) => {
                let obstacles = response.into_obstacles();
                let count = obstacles.len();
                self.session.update(|s| {
                    s.replace_obstacles(obstacles);
                    s.set_mode(InteractionMode::Routing);
                });
                info!(count, "obstacles saved");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "saving obstacles failed");
                self.session.update(|s| s.set_alert(Alert::ObstaclesSaveFailed));
                Err(err.into())
            }
        }
    }

    /// Replaces the local list with the server's current set. Unsaved
    /// drawings would be lost, so this is refused while editing.
    pub async fn refresh(&self) -> Result<usize, RequestError> {
        self.session.update(|s| {
            if s.mode().is_obstacle_editing() {
                return Err(PreconditionViolation::WrongMode {
                    required: InteractionMode::Routing,
                    actual: s.mode(),
                });
            }
            begin(s)
        })?;
        let _guard = InFlightGuard::obstacles(&self.session);

        match self.service.sync_obstacles(ObstaclesRequest::fetch()).await {
            Ok(response) => {
                let obstacles: Vec<Obstacle> = response.into_obstacles();
                let count = obstacles.len();
                self.session.update(|s| s.replace_obstacles(obstacles));
                info!(count, "obstacles loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "loading obstacles failed");
                self.session.update(|s| s.set_alert(Alert::ObstaclesLoadFailed));
                Err(err.into())
            }
        }
    }
}

fn require_editing(s: &SessionState) -> Result<(), PreconditionViolation> {
    if s.mode().is_obstacle_editing() {
        Ok(())
    } else {
        Err(PreconditionViolation::WrongMode {
            required: InteractionMode::ObstacleEditing,
            actual: s.mode(),
        })
    }
}

fn begin(s: &mut SessionState) -> Result<(), PreconditionViolation> {
    if s.in_flight().obstacles {
        return Err(PreconditionViolation::RequestInFlight);
    }
    s.set_obstacles_in_flight(true);
    Ok(())
}
