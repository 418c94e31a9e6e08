//! Observable state of an async task

use crate::error::ErrorDescriptor;

/// Lifecycle phase of an [`AsyncTask`](super::AsyncTask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of an async operation: last payload, phase and last error.
///
/// `payload` survives failures so a view can keep showing stale data while
/// reporting the error.
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncState<T> {
    pub payload: Option<T>,
    pub phase: Phase,
    pub error: Option<ErrorDescriptor>,
}

impl<T> AsyncState<T> {
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_success(&self) -> bool {
        self.phase == Phase::Success
    }

    pub fn is_error(&self) -> bool {
        self.phase == Phase::Error
    }
}

impl<T> Default for AsyncState<T> {
    fn default() -> Self {
        Self {
            payload: None,
            phase: Phase::Idle,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state: AsyncState<u32> = AsyncState::default();
        assert!(state.is_idle());
        assert!(state.payload.is_none());
        assert!(state.error.is_none());
    }
}
