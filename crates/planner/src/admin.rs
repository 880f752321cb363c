//! Moderator review of reported obstacles.
//!
//! The board is edited locally by toggling entries between the confirmed
//! and unconfirmed lists, then committed in one request. A toggle is
//! speculative: a failed commit leaves it in place so the moderator can
//! retry.

use std::sync::Arc;

use foundation::ObstacleId;
use parking_lot::Mutex;
use session::{ModerationBoard, Partition, PreconditionViolation};
use tracing::{info, warn};

use crate::error::RequestError;
use crate::protocol::{ConfirmObstaclesRequest, DeleteObstacleRequest};
use crate::service::{AdminSecret, PlannerService, ServiceError};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ModerationPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Committing,
    Deleting,
}

impl ModerationPhase {
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            ModerationPhase::Loading | ModerationPhase::Committing | ModerationPhase::Deleting
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModerationAlert {
    LoadFailed,
    UpdateFailed,
    DeleteFailed,
}

impl std::fmt::Display for ModerationAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationAlert::LoadFailed => {
                write!(f, "Failed to load. Check your secret or the server.")
            }
            ModerationAlert::UpdateFailed => write!(f, "Failed to update!"),
            ModerationAlert::DeleteFailed => write!(f, "Failed to delete!"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModerationView {
    pub phase: ModerationPhase,
    pub board: ModerationBoard,
    pub alert: Option<ModerationAlert>,
}

/// Asks the moderator a yes/no question before a destructive action.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

pub fn delete_prompt(id: ObstacleId) -> String {
    format!("Are you sure you want to delete obstacle #{id}?")
}

pub struct AdminModerationClient {
    service: Arc<dyn PlannerService>,
    view: Mutex<ModerationView>,
}

impl AdminModerationClient {
    pub fn new(service: Arc<dyn PlannerService>) -> Self {
        Self {
            service,
            view: Mutex::new(ModerationView::default()),
        }
    }

    pub fn view(&self) -> ModerationView {
        self.view.lock().clone()
    }

    pub fn phase(&self) -> ModerationPhase {
        self.view.lock().phase
    }

    pub fn alert(&self) -> Option<ModerationAlert> {
        self.view.lock().alert
    }

    /// Fetches both lists. Any previous board is discarded first, so a
    /// failure leaves the lists empty.
    pub async fn load(&self, secret: &AdminSecret) -> Result<usize, RequestError> {
        self.enter(ModerationPhase::Loading, |_| Ok(()))?;
        let _phase = PhaseGuard { view: &self.view };
        self.fetch(secret).await.map_err(RequestError::from)
    }

    /// Moves an obstacle to the end of the other list. Nothing is sent.
    pub fn toggle(&self, id: ObstacleId) -> Result<Partition, PreconditionViolation> {
        let mut view = self.view.lock();
        require_loaded(view.phase)?;
        let to = view
            .board
            .toggle(id)
            .ok_or(PreconditionViolation::UnknownObstacle(id))?;
        info!(%id, ?to, "obstacle toggled");
        Ok(to)
    }

    /// Submits the confirmed set and reloads on success.
    pub async fn commit(&self, secret: &AdminSecret) -> Result<usize, RequestError> {
        let request = self.enter(ModerationPhase::Committing, |view| {
            Ok(ConfirmObstaclesRequest {
                confirmed_ids: view.board.confirmed_ids(),
                all_ids: view.board.all_ids(),
            })
        })?;
        let _phase = PhaseGuard { view: &self.view };

        info!(
            confirmed = request.confirmed_ids.len(),
            total = request.all_ids.len(),
            "committing moderation"
        );
        if let Err(err) = self.service.confirm_obstacles(secret.clone(), request).await {
            warn!(error = %err, "moderation commit failed");
            self.settle(ModerationAlert::UpdateFailed);
            return Err(err.into());
        }
        self.view.lock().phase = ModerationPhase::Loading;
        self.fetch(secret).await.map_err(RequestError::from)
    }

    /// Deletes one obstacle after the moderator confirms, then reloads.
    pub async fn delete<P: ConfirmPrompt + ?Sized>(
        &self,
        id: ObstacleId,
        secret: &AdminSecret,
        prompt: &mut P,
    ) -> Result<DeleteOutcome, RequestError> {
        {
            let view = self.view.lock();
            require_loaded(view.phase)?;
            if view.board.partition_of(id).is_none() {
                return Err(PreconditionViolation::UnknownObstacle(id).into());
            }
        }
        if !prompt.confirm(&delete_prompt(id)) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.enter(ModerationPhase::Deleting, |_| Ok(()))?;
        let _phase = PhaseGuard { view: &self.view };

        info!(%id, "deleting obstacle");
        let request = DeleteObstacleRequest { node_id: id };
        if let Err(err) = self.service.delete_obstacle(secret.clone(), request).await {
            warn!(%id, error = %err, "obstacle delete failed");
            self.settle(ModerationAlert::DeleteFailed);
            return Err(err.into());
        }
        self.view.lock().phase = ModerationPhase::Loading;
        self.fetch(secret).await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Moves into a busy phase. `prepare` runs under the same lock and may
    /// reject the transition.
    fn enter<T>(
        &self,
        phase: ModerationPhase,
        prepare: impl FnOnce(&ModerationView) -> Result<T, PreconditionViolation>,
    ) -> Result<T, PreconditionViolation> {
        let mut view = self.view.lock();
        if view.phase.is_busy() {
            return Err(PreconditionViolation::RequestInFlight);
        }
        if phase != ModerationPhase::Loading {
            require_loaded(view.phase)?;
        }

        let prepared = prepare(&view)?;
        view.phase = phase;
        view.alert = None;
        if phase == ModerationPhase::Loading {
            view.board.clear();
        }
        Ok(prepared)
    }

    /// Returns to `Loaded` with the board untouched.
    fn settle(&self, alert: ModerationAlert) {
        let mut view = self.view.lock();
        view.phase = ModerationPhase::Loaded;
        view.alert = Some(alert);
    }

    async fn fetch(&self, secret: &AdminSecret) -> Result<usize, ServiceError> {
        let result = self.service.list_obstacles(secret.clone()).await;
        let mut view = self.view.lock();
        match result {
            Ok(lists) => {
                view.board = ModerationBoard::new(lists.confirmed, lists.unconfirmed);
                view.phase = ModerationPhase::Loaded;
                info!(
                    confirmed = view.board.confirmed().len(),
                    unconfirmed = view.board.unconfirmed().len(),
                    "moderation board loaded"
                );
                Ok(view.board.len())
            }
            Err(err) => {
                warn!(error = %err, forbidden = err.is_forbidden(), "moderation load failed");
                view.board.clear();
                view.phase = ModerationPhase::Idle;
                view.alert = Some(ModerationAlert::LoadFailed);
                Err(err)
            }
        }
    }
}

/// Leaves a busy phase if the request future is dropped before it settles.
struct PhaseGuard<'a> {
    view: &'a Mutex<ModerationView>,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        let mut view = self.view.lock();
        if view.phase.is_busy() {
            view.phase = if view.board.is_empty() {
                ModerationPhase::Idle
            } else {
                ModerationPhase::Loaded
            };
        }
    }
}

fn require_loaded(phase: ModerationPhase) -> Result<(), PreconditionViolation> {
    match phase {
        ModerationPhase::Loaded => Ok(()),
        p if p.is_busy() => Err(PreconditionViolation::RequestInFlight),
        _ => Err(PreconditionViolation::NotLoaded),
    }
}
