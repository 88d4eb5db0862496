use std::fmt;
use std::sync::{Mutex, PoisonError, Weak};

use super::SessionState;

/// The three request flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Upload,
    Generate,
    Optimize,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flow::Upload => "upload",
            Flow::Generate => "generate",
            Flow::Optimize => "optimize",
        })
    }
}

/// Which request, if any, is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Loading {
    #[default]
    Idle,
    Upload,
    Generate,
    Optimize,
}

impl Loading {
    pub fn pending(self) -> Option<Flow> {
        match self {
            Loading::Idle => None,
            Loading::Upload => Some(Flow::Upload),
            Loading::Generate => Some(Flow::Generate),
            Loading::Optimize => Some(Flow::Optimize),
        }
    }

    pub fn is_idle(self) -> bool {
        self == Loading::Idle
    }
}

impl From<Flow> for Loading {
    fn from(flow: Flow) -> Self {
        match flow {
            Flow::Upload => Loading::Upload,
            Flow::Generate => Loading::Generate,
            Flow::Optimize => Loading::Optimize,
        }
    }
}

/// Puts the session back to `Idle` when dropped, whether the flow returned,
/// failed, or its future was dropped mid-request.
pub(crate) struct LoadingGuard {
    state: Weak<Mutex<SessionState>>,
    flow: Flow,
}

impl LoadingGuard {
    pub(crate) fn new(state: Weak<Mutex<SessionState>>, flow: Flow) -> Self {
        Self { state, flow }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.loading == Loading::from(self.flow) {
            state.loading = Loading::Idle;
        }
    }
}
