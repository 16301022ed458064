//! Named state slices with structural replacement
//!
//! Every feature owns one [`Slice`]. A slice reducer never mutates the
//! current value: it either returns `None` (the slice keeps the identical
//! `Arc`) or a brand-new value that replaces the old one. Downstream
//! selectors rely on that to compare slices by identity.

use std::fmt;
use std::sync::Arc;

/// A pure slice reducer.
///
/// Returns `None` when the action does not change the slice, so that the
/// current reference survives untouched.
pub type SliceReducer<S, SA> = fn(&S, &SA) -> Option<S>;

/// A named, independently reducible partition of the store state.
pub struct Slice<S> {
    name: &'static str,
    state: Arc<S>,
}

impl<S> Slice<S> {
    /// Create a slice with its initial (seeded) value
    pub fn new(name: &'static str, initial: S) -> Self {
        Self {
            name,
            state: Arc::new(initial),
        }
    }

    /// Slice name used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value of the slice
    pub fn get(&self) -> &Arc<S> {
        &self.state
    }

    /// Apply a slice reducer.
    ///
    /// Returns `true` if the slice was replaced.
    pub fn reduce<SA>(&mut self, action: &SA, reducer: SliceReducer<S, SA>) -> bool {
        match reducer(&self.state, action) {
            Some(next) => {
                self.state = Arc::new(next);
                tracing::trace!(slice = self.name, "slice replaced");
                true
            }
            None => false,
        }
    }
}

impl<S> Clone for Slice<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Slice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish()
    }
}

/// Load/error pair used by content slices.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<D> {
    /// Last successfully loaded (or seeded) data
    pub data: Option<D>,
    /// Message of the last failed load
    pub error: Option<String>,
}

impl<D> Default for LoadState<D> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

impl<D> LoadState<D> {
    /// State pre-seeded with static content
    pub fn seeded(data: D) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// State after a successful load
    pub fn loaded(data: D) -> Self {
        Self::seeded(data)
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

impl<D: Clone> LoadState<D> {
    /// State after a failed load. Prior data stays in place.
    pub fn failed(&self, error: impl Into<String>) -> Self {
        Self {
            data: self.data.clone(),
            error: Some(error.into()),
        }
    }
}

/// Status of a long-running operation slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// State of an operation slice (`idle -> loading -> {success, error} -> idle`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationState {
    pub status: OperationStatus,
    /// Message returned by a successful operation
    pub message: Option<String>,
    /// Message of a failed operation
    pub error: Option<String>,
}

impl OperationState {
    /// Enter `loading`. A second request while already loading is not a transition.
    pub fn begin(&self) -> Option<Self> {
        if self.status == OperationStatus::Loading {
            return None;
        }
        Some(Self {
            status: OperationStatus::Loading,
            message: None,
            error: None,
        })
    }

    /// Enter `success`; only valid from `loading`.
    pub fn succeed(&self, message: impl Into<String>) -> Option<Self> {
        if self.status != OperationStatus::Loading {
            return None;
        }
        Some(Self {
            status: OperationStatus::Success,
            message: Some(message.into()),
            error: None,
        })
    }

    /// Enter `error`; only valid from `loading`.
    pub fn fail(&self, error: impl Into<String>) -> Option<Self> {
        if self.status != OperationStatus::Loading {
            return None;
        }
        Some(Self {
            status: OperationStatus::Error,
            message: None,
            error: Some(error.into()),
        })
    }

    /// Return to `idle`; only valid from `success` or `error`.
    pub fn reset(&self) -> Option<Self> {
        match self.status {
            OperationStatus::Success | OperationStatus::Error => Some(Self::default()),
            OperationStatus::Idle | OperationStatus::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == OperationStatus::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(state: &Vec<i32>, value: &i32) -> Option<Vec<i32>> {
        if *value < 0 {
            return None;
        }
        let mut next = state.clone();
        next.push(*value);
        Some(next)
    }

    #[test]
    fn test_slice_keeps_reference_when_unchanged() {
        let mut slice = Slice::new("numbers", vec![1]);
        let before = Arc::clone(slice.get());

        assert!(!slice.reduce(&-1, push));
        assert!(Arc::ptr_eq(&before, slice.get()));

        assert!(slice.reduce(&2, push));
        assert!(!Arc::ptr_eq(&before, slice.get()));
        assert_eq!(**slice.get(), vec![1, 2]);
        // The old value is untouched
        assert_eq!(*before, vec![1]);
    }

    #[test]
    fn test_load_state_failure_keeps_data() {
        let state = LoadState::seeded(vec!["a"]);
        let failed = state.failed("offline");
        assert_eq!(failed.data, Some(vec!["a"]));
        assert_eq!(failed.error.as_deref(), Some("offline"));

        let empty: LoadState<Vec<&str>> = LoadState::default();
        assert!(!empty.is_loaded());
        assert_eq!(empty.failed("boom").data, None);
    }

    #[test]
    fn test_operation_state_machine() {
        let idle = OperationState::default();
        assert_eq!(idle.status, OperationStatus::Idle);

        // Results and reset are ignored while idle
        assert!(idle.succeed("ok").is_none());
        assert!(idle.fail("no").is_none());
        assert!(idle.reset().is_none());

        let loading = idle.begin().unwrap();
        assert!(loading.is_loading());
        assert!(loading.begin().is_none());
        assert!(loading.reset().is_none());

        let success = loading.succeed("Thanks").unwrap();
        assert_eq!(success.status, OperationStatus::Success);
        assert_eq!(success.message.as_deref(), Some("Thanks"));

        let idle_again = success.reset().unwrap();
        assert_eq!(idle_again, OperationState::default());

        let error = loading.fail("taken").unwrap();
        assert_eq!(error.status, OperationStatus::Error);
        assert_eq!(error.error.as_deref(), Some("taken"));
        assert_eq!(error.reset().unwrap().status, OperationStatus::Idle);

        // A new request can start straight from a settled state
        assert!(error.begin().unwrap().is_loading());
    }
}
