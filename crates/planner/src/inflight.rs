use session::{SessionHandle, SessionState};

/// Clears an in-flight flag when dropped, including when the request future
/// is dropped before completing.
pub(crate) struct InFlightGuard {
    session: SessionHandle,
    clear: fn(&mut SessionState),
}

impl InFlightGuard {
    pub(crate) fn route(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
            clear: |s| s.set_route_in_flight(false),
        }
    }

    pub(crate) fn obstacles(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
            clear: |s| s.set_obstacles_in_flight(false),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.session.update(self.clear);
    }
}
