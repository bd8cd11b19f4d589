//! Session controller states and request kinds.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Lifecycle state of the session controller.
///
/// `LoggedOut -> CatalogLoading -> CatalogReady -> SessionStarting ->
/// InFlight <-> AwaitingReply -> EndInProgress -> Feedback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    LoggedOut,
    CatalogLoading,
    CatalogReady,
    SessionStarting,
    InFlight,
    AwaitingReply,
    EndInProgress,
    Feedback,
}

impl ControllerState {
    /// Whether an interview session exists in this state.
    pub fn has_session(&self) -> bool {
        matches!(
            self,
            ControllerState::InFlight
                | ControllerState::AwaitingReply
                | ControllerState::EndInProgress
                | ControllerState::Feedback
        )
    }

    /// Whether the elapsed-time clock runs in this state.
    pub fn clock_runs(&self) -> bool {
        matches!(self, ControllerState::InFlight | ControllerState::AwaitingReply)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::LoggedOut => write!(f, "logged_out"),
            ControllerState::CatalogLoading => write!(f, "catalog_loading"),
            ControllerState::CatalogReady => write!(f, "catalog_ready"),
            ControllerState::SessionStarting => write!(f, "session_starting"),
            ControllerState::InFlight => write!(f, "in_flight"),
            ControllerState::AwaitingReply => write!(f, "awaiting_reply"),
            ControllerState::EndInProgress => write!(f, "end_in_progress"),
            ControllerState::Feedback => write!(f, "feedback"),
        }
    }
}

impl FromStr for ControllerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logged_out" => Ok(ControllerState::LoggedOut),
            "catalog_loading" => Ok(ControllerState::CatalogLoading),
            "catalog_ready" => Ok(ControllerState::CatalogReady),
            "session_starting" => Ok(ControllerState::SessionStarting),
            "in_flight" => Ok(ControllerState::InFlight),
            "awaiting_reply" => Ok(ControllerState::AwaitingReply),
            "end_in_progress" => Ok(ControllerState::EndInProgress),
            "feedback" => Ok(ControllerState::Feedback),
            other => Err(format!("invalid controller state: '{other}'")),
        }
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        ControllerState::LoggedOut
    }
}

/// User actions that the controller gates by state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Login,
    Catalog,
    Start,
    Respond,
    End,
    Status,
    NewInterview,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Login => write!(f, "log in"),
            RequestKind::Catalog => write!(f, "load personas"),
            RequestKind::Start => write!(f, "start an interview"),
            RequestKind::Respond => write!(f, "send a message"),
            RequestKind::End => write!(f, "end the interview"),
            RequestKind::Status => write!(f, "check session status"),
            RequestKind::NewInterview => write!(f, "start over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ControllerState; 8] = [
        ControllerState::LoggedOut,
        ControllerState::CatalogLoading,
        ControllerState::CatalogReady,
        ControllerState::SessionStarting,
        ControllerState::InFlight,
        ControllerState::AwaitingReply,
        ControllerState::EndInProgress,
        ControllerState::Feedback,
    ];

    #[test]
    fn test_controller_state_roundtrip() {
        for state in ALL {
            let parsed: ControllerState = state.to_string().parse().unwrap();
            assert_eq!(state, parsed);
        }
    }

    #[test]
    fn test_controller_state_serde_matches_display() {
        for state in ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{state}\""));
        }
    }

    #[test]
    fn test_clock_runs_only_during_conversation() {
        let running: Vec<_> = ALL.into_iter().filter(|s| s.clock_runs()).collect();
        assert_eq!(
            running,
            vec![ControllerState::InFlight, ControllerState::AwaitingReply]
        );
    }

    #[test]
    fn test_default_is_logged_out() {
        assert_eq!(ControllerState::default(), ControllerState::LoggedOut);
    }
}
