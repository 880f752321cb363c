use std::sync::Arc;

use parking_lot::Mutex;

use crate::state::SessionState;

/// Shared handle to one session's state.
///
/// Every component of a session is constructed with a clone of the same
/// handle. Locks are scoped to the `read`/`update` closures, so no lock is
/// ever held across an await point.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub fn new(state: SessionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().clone()
    }

    pub fn same_session(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
