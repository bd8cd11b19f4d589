//! Event types published by the session controller.
//!
//! `ControllerEvent` is the signal the presentation layer re-renders on.
//! All variants are Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::interview::TurnRole;
use crate::state::{ControllerState, RequestKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// The controller moved between states.
    StateChanged {
        from: ControllerState,
        to: ControllerState,
    },

    /// A turn was appended to the transcript.
    TurnAppended {
        index: usize,
        role: TurnRole,
        pending: bool,
    },

    /// A pending user turn was acknowledged by a reply.
    TurnConfirmed { index: usize },

    /// A pending user turn was marked failed. It stays in the transcript
    /// and its text is offered back for retry.
    TurnFailed { index: usize },

    /// A user-visible error.
    Error { message: String },

    /// One-second tick of the interview clock.
    TimerTick { elapsed_secs: u64 },

    /// The active session was dropped by a forced logout.
    SessionAbandoned { session_id: String },

    /// A response arrived for a session that is no longer active.
    StaleResponseDiscarded { action: RequestKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_tagged() {
        let event = ControllerEvent::StateChanged {
            from: ControllerState::InFlight,
            to: ControllerState::AwaitingReply,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "state_changed");
        assert_eq!(json["to"], "awaiting_reply");
    }
}
