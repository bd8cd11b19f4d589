use thiserror::Error;

use crate::state::{ControllerState, RequestKind};

/// Errors from the local credential shape check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("invalid credential format: {0}")]
    InvalidFormat(String),
}

/// Outcome classification of a failed interview-service call.
///
/// The success side is the `Ok` of the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// HTTP 401 from any endpoint, regardless of body.
    #[error("invalid credential")]
    Unauthorized,

    /// Any other non-2xx status, network error, or decode error.
    #[error("{0}")]
    Failure(String),
}

/// Errors reported by the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("message is empty")]
    EmptyMessage,

    #[error("still waiting for the interviewer's reply")]
    ReplyPending,

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: RequestKind,
        state: ControllerState,
    },

    #[error("unknown persona '{0}'")]
    UnknownPersona(String),

    #[error("invalid credential, please check it and log in again")]
    Unauthorized,

    #[error("{0}")]
    Failure(String),

    #[error("no feedback available to export")]
    NoFeedback,
}

impl From<TransportError> for ControllerError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unauthorized => ControllerError::Unauthorized,
            TransportError::Failure(message) => ControllerError::Failure(message),
        }
    }
}
