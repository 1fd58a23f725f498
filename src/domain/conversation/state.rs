//! Conversation session state machine.
//!
//! ```text
//! Uninitialized --> Connecting --> Live
//!       |               |           |
//!       +--> Fallback <-+           v
//!              |   ^              Error
//!              |   +-- Connecting --+
//!              +--------> Error ----+
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle state of one chat or call exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Screen mounted, nothing attempted yet.
    #[default]
    Uninitialized,

    /// Provider session is being created.
    Connecting,

    /// Backed by a real provider session.
    Live,

    /// Replies come from the local canned pool.
    Fallback,

    /// A live or fallback session hit an error; replies are local until a retry.
    Error,
}

impl SessionState {
    /// Returns true if sends are routed to the provider.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Returns true if an explicit retry is meaningful.
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Fallback | Self::Error)
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            // Mount with a credential
            (Uninitialized, Connecting) |
            // Mount without a credential
            (Uninitialized, Fallback) |
            (Connecting, Live) |
            (Connecting, Fallback) |
            (Live, Error) |
            (Fallback, Error) |
            // Explicit retry
            (Fallback, Connecting) |
            (Error, Connecting)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Uninitialized => vec![Connecting, Fallback],
            Connecting => vec![Live, Fallback],
            Live => vec![Error],
            Fallback => vec![Connecting, Error],
            Error => vec![Connecting],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_live() {
        let state = SessionState::Uninitialized
            .transition_to(SessionState::Connecting)
            .and_then(|s| s.transition_to(SessionState::Live));
        assert_eq!(state, Ok(SessionState::Live));
    }

    #[test]
    fn live_cannot_jump_back_to_connecting() {
        assert!(SessionState::Live.transition_to(SessionState::Connecting).is_err());
    }

    #[test]
    fn only_degraded_states_can_retry() {
        assert!(SessionState::Fallback.can_retry());
        assert!(SessionState::Error.can_retry());
        assert!(!SessionState::Live.can_retry());
        assert!(!SessionState::Connecting.can_retry());
        assert!(!SessionState::Uninitialized.can_retry());
    }

    #[test]
    fn no_state_is_terminal() {
        for state in [
            SessionState::Uninitialized,
            SessionState::Connecting,
            SessionState::Live,
            SessionState::Fallback,
            SessionState::Error,
        ] {
            assert!(!state.is_terminal(), "{:?}", state);
            for target in state.valid_transitions() {
                assert!(state.can_transition_to(&target));
            }
        }
    }
}
