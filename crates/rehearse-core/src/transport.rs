//! InterviewTransport trait definition.
//!
//! The port the session controller drives the interview service through.
//! Uses RPITIT (native async fn in traits, Rust 2024 edition).
//!
//! Implementations live in rehearse-infra (e.g., `HttpInterviewTransport`).

use std::future::Future;

use rehearse_types::credential::Credential;
use rehearse_types::error::TransportError;
use rehearse_types::interview::{Feedback, SessionStatusReport};
use rehearse_types::persona::Persona;
use rehearse_types::wire::StartInterviewResponse;

/// Typed calls against the interview service.
///
/// Every method resolves to `Ok(payload)`, `Err(TransportError::Unauthorized)`
/// for a 401, or `Err(TransportError::Failure(message))` for anything else.
/// Implementations must not retry.
pub trait InterviewTransport: Send + Sync {
    /// Fetch the persona catalog. The credential is attached when present.
    fn list_personas(
        &self,
        credential: Option<&Credential>,
    ) -> impl Future<Output = Result<Vec<Persona>, TransportError>> + Send;

    /// Open a session with the given persona.
    fn start_interview(
        &self,
        credential: &Credential,
        persona_id: &str,
    ) -> impl Future<Output = Result<StartInterviewResponse, TransportError>> + Send;

    /// Send one user message and receive the interviewer's reply text.
    fn respond(
        &self,
        credential: &Credential,
        session_id: &str,
        user_message: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Close the session and receive feedback.
    fn end_interview(
        &self,
        credential: &Credential,
        session_id: &str,
    ) -> impl Future<Output = Result<Feedback, TransportError>> + Send;

    /// Probe the server-side state of a session.
    fn session_status(
        &self,
        credential: Option<&Credential>,
        session_id: &str,
    ) -> impl Future<Output = Result<SessionStatusReport, TransportError>> + Send;
}
