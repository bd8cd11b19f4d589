//! Transcript and feedback types for an interview session.
//!
//! A transcript is an append-only list of [`Turn`]s. User turns start out
//! [`TurnStatus::Pending`] and become [`TurnStatus::Confirmed`] once the
//! interview service has replied to them, or [`TurnStatus::Failed`] when the
//! send errored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Interviewer,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Interviewer => write!(f, "interviewer"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "interviewer" => Ok(TurnRole::Interviewer),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// Whether the interview service has acknowledged a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    /// Appended locally, reply not received yet.
    Pending,
    /// Seen by the interview service.
    Confirmed,
    /// The send failed. The service may still have recorded it.
    Failed,
}

/// One message exchanged within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    /// Client-side timestamp taken when the turn was appended.
    pub timestamp: DateTime<Utc>,
    pub status: TurnStatus,
}

impl Turn {
    /// An interviewer turn. Always confirmed: it came from the service.
    pub fn interviewer(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Interviewer,
            content: content.into(),
            timestamp: Utc::now(),
            status: TurnStatus::Confirmed,
        }
    }

    /// An optimistic user turn awaiting the service's reply.
    pub fn pending_user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            status: TurnStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TurnStatus::Pending
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == TurnStatus::Confirmed
    }
}

/// Critique text returned by the end call.
///
/// The service may hand back either a plain string or a structured JSON
/// object (`{"raw_feedback": "..."}` when its model output was not JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackBody {
    Text(String),
    Structured(serde_json::Value),
}

impl FeedbackBody {
    /// Render as plain text for display and export.
    pub fn to_plain_text(&self) -> String {
        match self {
            FeedbackBody::Text(text) => text.clone(),
            FeedbackBody::Structured(value) => {
                if let Some(raw) = value.get("raw_feedback").and_then(|v| v.as_str()) {
                    return raw.to_string();
                }
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Result of ending an interview. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Server-formatted duration string, shown verbatim.
    pub duration: String,
    pub message_count: u32,
    pub feedback: FeedbackBody,
}

/// Server-side view of an active session (status probe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatusReport {
    pub status: String,
    pub persona_id: String,
    pub message_count: u32,
}
