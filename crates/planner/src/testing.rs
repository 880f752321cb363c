//! In-memory service doubles for the orchestrator tests.

use std::collections::VecDeque;

use foundation::{GeoRect, LatLon};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::geocode::Geocoder;
use crate::protocol::{
    AdminObstacles, ConfirmObstaclesRequest, DeleteObstacleRequest, ObstaclesRequest,
    ObstaclesResponse, RouteRequest, RouteResponse,
};
use crate::service::{
    AdminSecret, BoxFuture, PlannerService, ServiceError, ServiceErrorKind,
};

pub(crate) fn transport_error() -> ServiceError {
    ServiceError::new(ServiceErrorKind::Transport, "connection refused")
}

type Canned<T> = Mutex<VecDeque<Result<T, ServiceError>>>;

fn next<T>(queue: &Canned<T>) -> Result<T, ServiceError> {
    queue.lock().pop_front().unwrap_or_else(|| Err(transport_error()))
}

/// Replays queued responses per endpoint and records what was sent. An
/// empty queue answers with a transport error.
#[derive(Default)]
pub(crate) struct FakePlanner {
    routes: Canned<RouteResponse>,
    obstacles: Canned<ObstaclesResponse>,
    admin_lists: Canned<AdminObstacles>,
    confirms: Canned<()>,
    deletes: Canned<()>,

    route_requests: Mutex<Vec<RouteRequest>>,
    obstacle_requests: Mutex<Vec<ObstaclesRequest>>,
    confirm_requests: Mutex<Vec<ConfirmObstaclesRequest>>,
    delete_requests: Mutex<Vec<DeleteObstacleRequest>>,
    secrets: Mutex<Vec<String>>,
    admin_list_calls: Mutex<usize>,

    gate: Option<watch::Sender<bool>>,
}

impl FakePlanner {
    /// Every call waits until [`FakePlanner::open_gate`].
    pub(crate) fn gated() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            gate: Some(tx),
            ..Self::default()
        }
    }

    pub(crate) fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.send_replace(true);
        }
    }

    pub(crate) fn close_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.send_replace(false);
        }
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            let mut rx = gate.subscribe();
            let _ = rx.wait_for(|open| *open).await;
        }
    }

    pub(crate) fn push_route(&self, response: Result<RouteResponse, ServiceError>) {
        self.routes.lock().push_back(response);
    }

    pub(crate) fn push_obstacles(&self, response: Result<ObstaclesResponse, ServiceError>) {
        self.obstacles.lock().push_back(response);
    }

    pub(crate) fn push_admin_list(&self, response: Result<AdminObstacles, ServiceError>) {
        self.admin_lists.lock().push_back(response);
    }

    pub(crate) fn push_confirm(&self, response: Result<(), ServiceError>) {
        self.confirms.lock().push_back(response);
    }

    pub(crate) fn push_delete(&self, response: Result<(), ServiceError>) {
        self.deletes.lock().push_back(response);
    }

    pub(crate) fn route_requests(&self) -> Vec<RouteRequest> {
        self.route_requests.lock().clone()
    }

    pub(crate) fn obstacle_requests(&self) -> Vec<ObstaclesRequest> {
        self.obstacle_requests.lock().clone()
    }

    pub(crate) fn confirm_requests(&self) -> Vec<ConfirmObstaclesRequest> {
        self.confirm_requests.lock().clone()
    }

    pub(crate) fn delete_requests(&self) -> Vec<DeleteObstacleRequest> {
        self.delete_requests.lock().clone()
    }

    pub(crate) fn secrets(&self) -> Vec<String> {
        self.secrets.lock().clone()
    }

    pub(crate) fn admin_list_calls(&self) -> usize {
        *self.admin_list_calls.lock()
    }

    fn record_secret(&self, secret: &AdminSecret) {
        self.secrets.lock().push(secret.expose().to_string());
    }
}

impl PlannerService for FakePlanner {
    fn plan_route(&self, request: RouteRequest) -> BoxFuture<'_, Result<RouteResponse, ServiceError>> {
        Box::pin(async move {
            self.route_requests.lock().push(request);
            self.pass_gate().await;
            next(&self.routes)
        })
    }

    fn sync_obstacles(
        &self,
        request: ObstaclesRequest,
    ) -> BoxFuture<'_, Result<ObstaclesResponse, ServiceError>> {
        Box::pin(async move {
            self.obstacle_requests.lock().push(request);
            self.pass_gate().await;
            next(&self.obstacles)
        })
    }

    fn list_obstacles(&self, secret: AdminSecret) -> BoxFuture<'_, Result<AdminObstacles, ServiceError>> {
        Box::pin(async move {
            self.record_secret(&secret);
            *self.admin_list_calls.lock() += 1;
            self.pass_gate().await;
            next(&self.admin_lists)
        })
    }

    fn confirm_obstacles(
        &self,
        secret: AdminSecret,
        request: ConfirmObstaclesRequest,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            self.record_secret(&secret);
            self.confirm_requests.lock().push(request);
            self.pass_gate().await;
            next(&self.confirms)
        })
    }

    fn delete_obstacle(
        &self,
        secret: AdminSecret,
        request: DeleteObstacleRequest,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            self.record_secret(&secret);
            self.delete_requests.lock().push(request);
            self.pass_gate().await;
            next(&self.deletes)
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeGeocoder {
    hits: Canned<Option<LatLon>>,
    queries: Mutex<Vec<(String, GeoRect)>>,
}

impl FakeGeocoder {
    pub(crate) fn push(&self, hit: Result<Option<LatLon>, ServiceError>) {
        self.hits.lock().push_back(hit);
    }

    pub(crate) fn queries(&self) -> Vec<(String, GeoRect)> {
        self.queries.lock().clone()
    }
}

impl Geocoder for FakeGeocoder {
    fn lookup(
        &self,
        query: String,
        region: GeoRect,
    ) -> BoxFuture<'_, Result<Option<LatLon>, ServiceError>> {
        Box::pin(async move {
            self.queries.lock().push((query, region));
            next(&self.hits)
        })
    }
}
