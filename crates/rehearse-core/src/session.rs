//! A single active interview session and its transcript.
//!
//! The transcript is append-only: turns are never removed, reordered, or
//! edited after append. Only a user turn's status moves, from pending to
//! confirmed or failed.

use chrono::{DateTime, Utc};

use rehearse_types::error::ControllerError;
use rehearse_types::interview::{Turn, TurnRole, TurnStatus};
use rehearse_types::persona::Persona;

#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: String,
    persona: Persona,
    started_at: DateTime<Utc>,
    turns: Vec<Turn>,
    /// At most one respond call may be outstanding.
    waiting_for_reply: bool,
}

impl InterviewSession {
    /// Create a session whose first turn is the interviewer's opening question.
    pub fn new(id: String, persona: Persona, opening_question: String) -> Self {
        Self {
            id,
            persona,
            started_at: Utc::now(),
            turns: vec![Turn::interviewer(opening_question)],
            waiting_for_reply: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn waiting_for_reply(&self) -> bool {
        self.waiting_for_reply
    }

    /// Optimistically append a user turn. Returns its index.
    pub fn push_pending_user(&mut self, content: String) -> Result<usize, ControllerError> {
        if self.waiting_for_reply {
            return Err(ControllerError::ReplyPending);
        }
        self.turns.push(Turn::pending_user(content));
        self.waiting_for_reply = true;
        Ok(self.turns.len() - 1)
    }

    /// Confirm the pending user turn and append the interviewer's reply.
    ///
    /// Returns `(confirmed_index, reply_index)`; `confirmed_index` is `None`
    /// when no pending turn was found.
    pub fn confirm_reply(&mut self, reply: String) -> (Option<usize>, usize) {
        let confirmed = self.pending_index();
        if let Some(index) = confirmed {
            self.turns[index].status = TurnStatus::Confirmed;
        }
        self.turns.push(Turn::interviewer(reply));
        self.waiting_for_reply = false;
        (confirmed, self.turns.len() - 1)
    }

    /// Mark the pending user turn failed and release the send slot.
    ///
    /// Returns the turn's index and text.
    pub fn fail_pending(&mut self) -> Option<(usize, String)> {
        self.waiting_for_reply = false;
        let index = self.pending_index()?;
        let turn = &mut self.turns[index];
        turn.status = TurnStatus::Failed;
        Some((index, turn.content.clone()))
    }

    /// Text of the pending user turn, if any.
    pub fn pending_text(&self) -> Option<&str> {
        self.pending_index()
            .map(|index| self.turns[index].content.as_str())
    }

    /// Number of user turns the service has acknowledged.
    pub fn answered_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|turn| turn.role == TurnRole::User && turn.is_confirmed())
            .count()
    }

    fn pending_index(&self) -> Option<usize> {
        self.turns.iter().rposition(Turn::is_pending)
    }
}
