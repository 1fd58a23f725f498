//! State machine trait for lifecycle enums.
//!
//! Gives every lifecycle status (conversation session, video call) the same
//! validated transition API.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list the legal edges; `transition_to` rejects the rest.
///
/// ```ignore
/// let next = SessionState::Connecting.transition_to(SessionState::Live)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lamp {
        Off,
        On,
        Broken,
    }

    impl StateMachine for Lamp {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Lamp::Off => vec![Lamp::On],
                Lamp::On => vec![Lamp::Off, Lamp::Broken],
                Lamp::Broken => vec![],
            }
        }
    }

    #[test]
    fn transition_to_accepts_listed_edge() {
        assert_eq!(Lamp::Off.transition_to(Lamp::On), Ok(Lamp::On));
    }

    #[test]
    fn transition_to_rejects_unlisted_edge() {
        let err = Lamp::Off.transition_to(Lamp::Broken).unwrap_err();
        assert_eq!(err.to_string(), "Cannot transition from Off to Broken");
    }

    #[test]
    fn state_without_exits_is_terminal() {
        assert!(Lamp::Broken.is_terminal());
        assert!(!Lamp::On.is_terminal());
    }
}
