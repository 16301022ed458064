//! Action trait for type-safe state transitions

use std::fmt::Debug;

/// Where an action sits in the request/result vocabulary of a slice.
///
/// Slices follow a fixed naming pattern: `Load<Noun>` starts work,
/// `Load<Noun>Success` / `Load<Noun>Failure` carry the outcome back, and
/// `Reset<Noun>State` returns an operation slice to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionPhase {
    /// User or system intent; may trigger an effect
    #[default]
    Intent,
    /// Result of a completed effect
    Success,
    /// Normalized failure of an effect
    Failure,
    /// Explicit return to the idle state
    Reset,
}

impl ActionPhase {
    /// Returns true for actions dispatched by the effect runner.
    pub fn is_result(self) -> bool {
        matches!(self, ActionPhase::Success | ActionPhase::Failure)
    }

    /// Lowercase label for logs
    pub fn as_str(self) -> &'static str {
        match self {
            ActionPhase::Intent => "intent",
            ActionPhase::Success => "success",
            ActionPhase::Failure => "failure",
            ActionPhase::Reset => "reset",
        }
    }
}

/// Marker trait for actions that can be dispatched to the store
///
/// Actions are immutable event records. They should be:
/// - Clone: Actions are observed by middleware, effects, and the log
/// - Debug: For debugging and logging
/// - Send + 'static: Result actions travel back from spawned effect tasks
///
/// Use `#[derive(Action)]` from `storefront-dispatch-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;

    /// Get the action's phase in the request/result vocabulary
    fn phase(&self) -> ActionPhase {
        ActionPhase::Intent
    }
}

/// Concise, human-readable action description for logs.
///
/// The default falls back to `Debug`; override it for actions that carry
/// large payloads (record lists, content blocks).
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_phases() {
        assert!(ActionPhase::Success.is_result());
        assert!(ActionPhase::Failure.is_result());
        assert!(!ActionPhase::Intent.is_result());
        assert!(!ActionPhase::Reset.is_result());
        assert_eq!(ActionPhase::default(), ActionPhase::Intent);
    }
}
