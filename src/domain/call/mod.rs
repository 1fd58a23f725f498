//! Video call screen vocabulary.
//!
//! A call is either an embedded provider session or the explicitly labelled
//! demo mode, in which only local mute/camera toggles exist.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, StateMachine};

/// Lifecycle of the call screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    #[default]
    Idle,
    Connecting,
    InCall,
}

impl StateMachine for CallStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CallStatus::*;
        matches!(
            (self, target),
            (Idle, Connecting) | (Connecting, InCall) | (Connecting, Idle) | (InCall, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CallStatus::*;
        match self {
            Idle => vec![Connecting],
            Connecting => vec![InCall, Idle],
            InCall => vec![Idle],
        }
    }
}

/// How an active call is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CallMode {
    /// Provider-controlled page embedded with camera/microphone access.
    /// Its contents are opaque to this crate.
    Embedded {
        conversation_id: ConversationId,
        conversation_url: String,
    },
    /// Degraded mode: static avatar, local-only toggles, no connectivity.
    Demo { muted: bool, camera_off: bool },
}

impl CallMode {
    pub fn demo() -> Self {
        CallMode::Demo {
            muted: false,
            camera_off: false,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, CallMode::Demo { .. })
    }

    /// Banner shown while in this mode.
    pub fn label(&self) -> &'static str {
        match self {
            CallMode::Embedded { .. } => "Live video session",
            CallMode::Demo { .. } => {
                "Demo mode active. Configure Tavus API for full video chat experience."
            }
        }
    }
}

/// Formats elapsed call seconds as `mm:ss`.
pub fn format_call_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_call_duration(0), "00:00");
        assert_eq!(format_call_duration(75), "01:15");
        assert_eq!(format_call_duration(3600), "60:00");
    }

    #[test]
    fn demo_mode_is_labelled() {
        let mode = CallMode::demo();
        assert!(mode.is_demo());
        assert!(mode.label().starts_with("Demo mode"));
    }

    #[test]
    fn in_call_only_returns_to_idle() {
        assert_eq!(CallStatus::InCall.valid_transitions(), vec![CallStatus::Idle]);
        assert!(CallStatus::Idle.transition_to(CallStatus::InCall).is_err());
    }
}
