//! Session controller: the interview lifecycle state machine.
//!
//! The controller is the sole authority translating transport outcomes into
//! state transitions. Every network action is split in two halves:
//!
//! 1. `begin_*` validates the action against the current state, applies the
//!    optimistic local change, and returns a [`RequestTicket`].
//! 2. `complete_*` applies the call's outcome, unless the ticket is stale.
//!
//! Tickets carry the controller epoch, which logout and reset bump, plus the
//! session id the call was issued for. A completion whose ticket no longer
//! matches is discarded instead of being applied to a newer session. The
//! `async` convenience methods (`load_catalog`, `send_message`, ...) run both
//! halves around a transport call.

use chrono::Local;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use rehearse_types::credential::Credential;
use rehearse_types::error::{ControllerError, TransportError};
use rehearse_types::event::ControllerEvent;
use rehearse_types::interview::{Feedback, SessionStatusReport, Turn, TurnRole};
use rehearse_types::persona::Persona;
use rehearse_types::state::{ControllerState, RequestKind};
use rehearse_types::wire::StartInterviewResponse;

use crate::clock::{ClockTicker, SessionClock};
use crate::credential::CredentialStore;
use crate::event::EventBus;
use crate::export::{build_feedback_export, FeedbackExport};
use crate::session::InterviewSession;
use crate::transport::InterviewTransport;

/// Handle for one outstanding network call.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    kind: RequestKind,
    epoch: u64,
    session_id: Option<String>,
    credential: Option<Credential>,
    payload: Option<String>,
}

impl RequestTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Session the call belongs to, for session-scoped calls.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Credential captured when the call was issued.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Persona id for a start call, message text for a respond call.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

/// Whether a completion changed controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The ticket belonged to an abandoned session or epoch.
    Discarded,
}

pub struct SessionController<T: InterviewTransport> {
    transport: T,
    store: CredentialStore,
    state: ControllerState,
    catalog: Vec<Persona>,
    selected: Option<Persona>,
    session: Option<InterviewSession>,
    /// Session dropped by a forced logout, kept read-only.
    abandoned: Option<InterviewSession>,
    /// Text of the last user turn whose send failed or was rejected.
    unsent_draft: Option<String>,
    feedback: Option<Feedback>,
    last_status: Option<SessionStatusReport>,
    clock: SessionClock,
    ticker: Option<ClockTicker>,
    events: EventBus,
    epoch: u64,
}

impl<T: InterviewTransport> SessionController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            store: CredentialStore::new(),
            state: ControllerState::LoggedOut,
            catalog: Vec::new(),
            selected: None,
            session: None,
            abandoned: None,
            unsent_draft: None,
            feedback: None,
            last_status: None,
            clock: SessionClock::new(),
            ticker: None,
            events: EventBus::default(),
            epoch: 0,
        }
    }

    // --- Read-only views ---

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_set()
    }

    /// Masked credential for status displays.
    pub fn masked_credential(&self) -> Option<String> {
        self.store.get().map(Credential::masked)
    }

    pub fn catalog(&self) -> &[Persona] {
        &self.catalog
    }

    pub fn session(&self) -> Option<&InterviewSession> {
        self.session.as_ref()
    }

    /// Transcript of the active session; empty when there is none.
    pub fn transcript(&self) -> &[Turn] {
        self.session
            .as_ref()
            .map(InterviewSession::turns)
            .unwrap_or(&[])
    }

    pub fn active_persona(&self) -> Option<&Persona> {
        self.session
            .as_ref()
            .map(InterviewSession::persona)
            .or(self.selected.as_ref())
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn last_status(&self) -> Option<&SessionStatusReport> {
        self.last_status.as_ref()
    }

    pub fn abandoned_session(&self) -> Option<&InterviewSession> {
        self.abandoned.as_ref()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed_secs()
    }

    /// Interview clock as `mm:ss`.
    pub fn elapsed_display(&self) -> String {
        self.clock.display()
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Text of the last message whose send did not get a reply.
    pub fn unsent_draft(&self) -> Option<&str> {
        self.unsent_draft.as_deref()
    }

    /// Take the unsent text for resubmission.
    pub fn take_unsent_draft(&mut self) -> Option<String> {
        self.unsent_draft.take()
    }

    // --- Login / logout ---

    /// Store a credential and move to `CatalogLoading`.
    ///
    /// A malformed credential leaves the controller in `LoggedOut`.
    pub fn login(&mut self, raw: &str) -> Result<(), ControllerError> {
        if self.state != ControllerState::LoggedOut {
            return Err(self.invalid(RequestKind::Login));
        }
        if let Err(err) = self.store.set(raw) {
            self.report(err.to_string());
            return Err(err.into());
        }
        info!(credential = %self.masked_credential().unwrap_or_default(), "Logged in");
        self.transition(ControllerState::CatalogLoading);
        Ok(())
    }

    /// User-initiated logout. Legal in every state; idempotent.
    ///
    /// Clears the credential, catalog, session, and any abandoned session.
    pub fn logout(&mut self) {
        self.teardown();
        self.abandoned = None;
        self.unsent_draft = None;
        info!("Logged out");
        self.transition(ControllerState::LoggedOut);
    }

    /// Forced logout after the service rejected the credential.
    ///
    /// The active session is kept read-only as the abandoned session.
    fn force_logout(&mut self, error: ControllerError) -> ControllerError {
        if let Some(session) = self.session.take() {
            warn!(session_id = %session.id(), "Session abandoned by forced logout");
            self.events.publish(ControllerEvent::SessionAbandoned {
                session_id: session.id().to_string(),
            });
            self.abandoned = Some(session);
        }
        self.teardown();
        self.report(error.to_string());
        self.transition(ControllerState::LoggedOut);
        error
    }

    fn teardown(&mut self) {
        self.stop_ticker();
        self.clock.reset();
        self.store.clear();
        self.catalog.clear();
        self.selected = None;
        self.session = None;
        self.feedback = None;
        self.last_status = None;
        self.epoch += 1;
    }

    // --- Catalog ---

    pub fn begin_catalog(&mut self) -> Result<RequestTicket, ControllerError> {
        if self.state != ControllerState::CatalogLoading {
            return Err(self.invalid(RequestKind::Catalog));
        }
        Ok(self.ticket(RequestKind::Catalog, None))
    }

    pub fn complete_catalog(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<Persona>, TransportError>,
    ) -> Result<Completion, ControllerError> {
        if !self.is_current(&ticket, RequestKind::Catalog, &[ControllerState::CatalogLoading]) {
            return Ok(self.discard(&ticket));
        }
        match outcome {
            Ok(personas) => {
                info!(count = personas.len(), "Persona catalog loaded");
                self.catalog = personas;
                self.transition(ControllerState::CatalogReady);
                Ok(Completion::Applied)
            }
            Err(TransportError::Unauthorized) => Err(self.force_logout(ControllerError::Unauthorized)),
            Err(TransportError::Failure(message)) => {
                // Stays in CatalogLoading; retry is a fresh user action.
                Err(self.fail(format!("Failed to load interview types: {message}")))
            }
        }
    }

    pub async fn load_catalog(&mut self) -> Result<Completion, ControllerError> {
        let ticket = self.begin_catalog()?;
        let outcome = self.transport.list_personas(ticket.credential()).await;
        self.complete_catalog(ticket, outcome)
    }

    // --- Start ---

    /// Pick a persona from the catalog and move to `SessionStarting`.
    pub fn choose_persona(&mut self, persona_id: &str) -> Result<RequestTicket, ControllerError> {
        if self.state != ControllerState::CatalogReady {
            return Err(self.invalid(RequestKind::Start));
        }
        let Some(persona) = self.catalog.iter().find(|p| p.id == persona_id).cloned() else {
            return Err(ControllerError::UnknownPersona(persona_id.to_string()));
        };
        self.selected = Some(persona);
        self.transition(ControllerState::SessionStarting);
        Ok(self.ticket(RequestKind::Start, Some(persona_id.to_string())))
    }

    pub fn complete_start(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<StartInterviewResponse, TransportError>,
    ) -> Result<Completion, ControllerError> {
        if !self.is_current(&ticket, RequestKind::Start, &[ControllerState::SessionStarting]) {
            return Ok(self.discard(&ticket));
        }
        match outcome {
            Ok(started) => {
                let persona = match (self.selected.take(), started.persona) {
                    (Some(chosen), Some(echo)) => chosen.merged_with(&echo),
                    (Some(chosen), None) => chosen,
                    (None, Some(echo)) => echo,
                    (None, None) => {
                        self.transition(ControllerState::CatalogReady);
                        return Err(self.fail("Error starting interview: no persona for session".to_string()));
                    }
                };
                info!(session_id = %started.session_id, persona = %persona.id, "Interview started");
                self.session = Some(InterviewSession::new(
                    started.session_id,
                    persona,
                    started.opening_question,
                ));
                self.abandoned = None;
                self.feedback = None;
                self.last_status = None;
                self.events.publish(ControllerEvent::TurnAppended {
                    index: 0,
                    role: TurnRole::Interviewer,
                    pending: false,
                });
                self.clock.start();
                self.start_ticker();
                self.transition(ControllerState::InFlight);
                Ok(Completion::Applied)
            }
            Err(TransportError::Unauthorized) => Err(self.force_logout(ControllerError::Unauthorized)),
            Err(TransportError::Failure(message)) => {
                self.selected = None;
                self.transition(ControllerState::CatalogReady);
                Err(self.fail(format!("Error starting interview: {message}")))
            }
        }
    }

    pub async fn start_interview(&mut self, persona_id: &str) -> Result<Completion, ControllerError> {
        let ticket = self.choose_persona(persona_id)?;
        let outcome = match ticket.credential() {
            Some(credential) => {
                self.transport
                    .start_interview(credential, ticket.payload().unwrap_or(persona_id))
                    .await
            }
            None => Err(TransportError::Unauthorized),
        };
        self.complete_start(ticket, outcome)
    }

    // --- Respond ---

    /// Optimistically append a user turn and move to `AwaitingReply`.
    ///
    /// Empty or whitespace-only text and a second send while a reply is
    /// outstanding are rejected without touching the transcript.
    pub fn begin_send(&mut self, text: &str) -> Result<RequestTicket, ControllerError> {
        let message = text.trim();
        if message.is_empty() {
            return Err(ControllerError::EmptyMessage);
        }
        match self.state {
            ControllerState::InFlight => {}
            ControllerState::AwaitingReply => return Err(ControllerError::ReplyPending),
            _ => return Err(self.invalid(RequestKind::Respond)),
        }
        let Some(session) = self.session.as_mut() else {
            return Err(self.invalid(RequestKind::Respond));
        };
        let index = session.push_pending_user(message.to_string())?;
        self.unsent_draft = None;
        self.events.publish(ControllerEvent::TurnAppended {
            index,
            role: TurnRole::User,
            pending: true,
        });
        self.transition(ControllerState::AwaitingReply);
        Ok(self.ticket(RequestKind::Respond, Some(message.to_string())))
    }

    pub fn complete_send(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<String, TransportError>,
    ) -> Result<Completion, ControllerError> {
        if !self.is_current(&ticket, RequestKind::Respond, &[ControllerState::AwaitingReply]) {
            return Ok(self.discard(&ticket));
        }
        match outcome {
            Ok(reply) => {
                if let Some(session) = self.session.as_mut() {
                    let (confirmed, reply_index) = session.confirm_reply(reply);
                    if let Some(index) = confirmed {
                        self.events.publish(ControllerEvent::TurnConfirmed { index });
                    }
                    self.events.publish(ControllerEvent::TurnAppended {
                        index: reply_index,
                        role: TurnRole::Interviewer,
                        pending: false,
                    });
                }
                self.transition(ControllerState::InFlight);
                Ok(Completion::Applied)
            }
            Err(TransportError::Unauthorized) => {
                // The pending turn stays in the abandoned session.
                self.unsent_draft = self
                    .session
                    .as_ref()
                    .and_then(|s| s.pending_text())
                    .map(str::to_string);
                Err(self.force_logout(ControllerError::Unauthorized))
            }
            Err(TransportError::Failure(message)) => {
                // The turn stays in the transcript, marked failed.
                if let Some((index, content)) = self.session.as_mut().and_then(InterviewSession::fail_pending) {
                    debug!(index, "User turn marked failed");
                    self.events.publish(ControllerEvent::TurnFailed { index });
                    self.unsent_draft = Some(content);
                }
                self.transition(ControllerState::InFlight);
                Err(self.fail(format!("Error: {message}")))
            }
        }
    }

    pub async fn send_message(&mut self, text: &str) -> Result<Completion, ControllerError> {
        let ticket = self.begin_send(text)?;
        let outcome = match (ticket.credential(), ticket.session_id(), ticket.payload()) {
            (Some(credential), Some(session_id), Some(message)) => {
                self.transport.respond(credential, session_id, message).await
            }
            _ => Err(TransportError::Failure("request is missing session data".to_string())),
        };
        self.complete_send(ticket, outcome)
    }

    // --- End ---

    /// Freeze the transcript, stop the clock, and move to `EndInProgress`.
    pub fn begin_end(&mut self) -> Result<RequestTicket, ControllerError> {
        if self.state != ControllerState::InFlight || self.session.is_none() {
            return Err(self.invalid(RequestKind::End));
        }
        self.clock.stop();
        self.stop_ticker();
        self.transition(ControllerState::EndInProgress);
        Ok(self.ticket(RequestKind::End, None))
    }

    pub fn complete_end(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Feedback, TransportError>,
    ) -> Result<Completion, ControllerError> {
        if !self.is_current(&ticket, RequestKind::End, &[ControllerState::EndInProgress]) {
            return Ok(self.discard(&ticket));
        }
        match outcome {
            Ok(feedback) => {
                info!(
                    duration = %feedback.duration,
                    message_count = feedback.message_count,
                    "Interview ended"
                );
                self.feedback = Some(feedback);
                self.transition(ControllerState::Feedback);
                Ok(Completion::Applied)
            }
            Err(TransportError::Unauthorized) => Err(self.force_logout(ControllerError::Unauthorized)),
            Err(TransportError::Failure(message)) => {
                // Re-arm from the frozen count, not from zero.
                self.clock.resume();
                self.start_ticker();
                self.transition(ControllerState::InFlight);
                Err(self.fail(format!("Error ending interview: {message}")))
            }
        }
    }

    pub async fn end_interview(&mut self) -> Result<Completion, ControllerError> {
        let ticket = self.begin_end()?;
        let outcome = match (ticket.credential(), ticket.session_id()) {
            (Some(credential), Some(session_id)) => {
                self.transport.end_interview(credential, session_id).await
            }
            _ => Err(TransportError::Failure("request is missing session data".to_string())),
        };
        self.complete_end(ticket, outcome)
    }

    // --- Status probe ---

    /// Ask the service about the active session. Never changes state.
    pub fn begin_status(&mut self) -> Result<RequestTicket, ControllerError> {
        if !self.state.clock_runs() || self.session.is_none() {
            return Err(self.invalid(RequestKind::Status));
        }
        Ok(self.ticket(RequestKind::Status, None))
    }

    pub fn complete_status(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<SessionStatusReport, TransportError>,
    ) -> Result<Completion, ControllerError> {
        let live = [ControllerState::InFlight, ControllerState::AwaitingReply];
        if !self.is_current(&ticket, RequestKind::Status, &live) {
            return Ok(self.discard(&ticket));
        }
        match outcome {
            Ok(report) => {
                debug!(status = %report.status, message_count = report.message_count, "Session status");
                self.last_status = Some(report);
                Ok(Completion::Applied)
            }
            Err(TransportError::Unauthorized) => Err(self.force_logout(ControllerError::Unauthorized)),
            Err(TransportError::Failure(message)) => Err(self.fail(message)),
        }
    }

    pub async fn refresh_status(&mut self) -> Result<SessionStatusReport, ControllerError> {
        let ticket = self.begin_status()?;
        let outcome = match ticket.session_id() {
            Some(session_id) => self.transport.session_status(ticket.credential(), session_id).await,
            None => Err(TransportError::Failure("request is missing session data".to_string())),
        };
        self.complete_status(ticket, outcome)?;
        self.last_status
            .clone()
            .ok_or_else(|| ControllerError::Failure("no status received".to_string()))
    }

    // --- Feedback ---

    /// Leave the feedback screen for a fresh persona pick. The catalog is kept.
    pub fn new_interview(&mut self) -> Result<(), ControllerError> {
        if self.state != ControllerState::Feedback {
            return Err(self.invalid(RequestKind::NewInterview));
        }
        self.stop_ticker();
        self.clock.reset();
        self.session = None;
        self.selected = None;
        self.feedback = None;
        self.last_status = None;
        self.epoch += 1;
        self.transition(ControllerState::CatalogReady);
        Ok(())
    }

    /// Compose the plain-text feedback document from memory.
    pub fn export_feedback(&self) -> Result<FeedbackExport, ControllerError> {
        match (self.state, self.session.as_ref(), self.feedback.as_ref()) {
            (ControllerState::Feedback, Some(session), Some(feedback)) => Ok(build_feedback_export(
                session.persona(),
                feedback,
                session.turns(),
                Local::now(),
            )),
            _ => Err(ControllerError::NoFeedback),
        }
    }

    // --- Internals ---

    fn ticket(&self, kind: RequestKind, payload: Option<String>) -> RequestTicket {
        RequestTicket {
            kind,
            epoch: self.epoch,
            session_id: self.session.as_ref().map(|s| s.id().to_string()),
            credential: self.store.get().cloned(),
            payload,
        }
    }

    fn is_current(&self, ticket: &RequestTicket, kind: RequestKind, states: &[ControllerState]) -> bool {
        let session_id = self.session.as_ref().map(InterviewSession::id);
        ticket.kind == kind
            && ticket.epoch == self.epoch
            && ticket.session_id.as_deref() == session_id
            && states.contains(&self.state)
    }

    fn discard(&self, ticket: &RequestTicket) -> Completion {
        debug!(
            action = ?ticket.kind,
            ticket_epoch = ticket.epoch,
            epoch = self.epoch,
            state = %self.state,
            "Discarding stale response"
        );
        self.events.publish(ControllerEvent::StaleResponseDiscarded { action: ticket.kind });
        Completion::Discarded
    }

    fn invalid(&self, action: RequestKind) -> ControllerError {
        ControllerError::InvalidTransition {
            action,
            state: self.state,
        }
    }

    fn report(&self, message: String) {
        self.events.publish(ControllerEvent::Error { message });
    }

    fn fail(&self, message: String) -> ControllerError {
        warn!(state = %self.state, "{message}");
        self.report(message.clone());
        ControllerError::Failure(message)
    }

    fn transition(&mut self, to: ControllerState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(from = %from, to = %to, "State transition");
        self.events.publish(ControllerEvent::StateChanged { from, to });
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();
        self.ticker = ClockTicker::spawn(&self.clock, self.events.clone());
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}
