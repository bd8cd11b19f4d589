//! Plain-text feedback export.
//!
//! Built purely from in-memory state; no network round-trip.

use chrono::{DateTime, TimeZone};

use rehearse_types::interview::{Feedback, Turn, TurnRole};
use rehearse_types::persona::Persona;

/// A ready-to-write feedback document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackExport {
    pub file_name: String,
    pub content: String,
}

/// Compose the downloadable feedback document.
///
/// Only confirmed turns make the transcript section.
pub fn build_feedback_export<Tz>(
    persona: &Persona,
    feedback: &Feedback,
    turns: &[Turn],
    generated_at: DateTime<Tz>,
) -> FeedbackExport
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut transcript = String::new();
    for turn in turns.iter().filter(|turn| turn.is_confirmed()) {
        let speaker = match turn.role {
            TurnRole::User => "You",
            TurnRole::Interviewer => persona.name.as_str(),
        };
        transcript.push_str(&format!("{speaker}:\n{}\n\n", turn.content));
    }

    let content = format!(
        "AI MOCK INTERVIEW FEEDBACK\n\
         ==========================\n\
         \n\
         Interviewer: {name}\n\
         Duration: {duration}\n\
         Questions answered: {count}\n\
         \n\
         FEEDBACK\n\
         --------\n\
         {feedback}\n\
         \n\
         TRANSCRIPT\n\
         ----------\n\
         {transcript}\
         Generated on: {generated}\n",
        name = persona.name,
        duration = feedback.duration,
        count = feedback.message_count,
        feedback = feedback.feedback.to_plain_text().trim_end(),
        transcript = transcript,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
    );

    FeedbackExport {
        file_name: format!("interview-feedback-{}.txt", generated_at.timestamp_millis()),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rehearse_types::interview::FeedbackBody;

    fn persona() -> Persona {
        Persona {
            id: "case".to_string(),
            emoji: "📊".to_string(),
            name: "Michael Torres".to_string(),
            title: "Senior Management Consultant".to_string(),
            company: "McKinsey & Co".to_string(),
            description: String::new(),
        }
    }

    fn feedback() -> Feedback {
        Feedback {
            duration: "05:12".to_string(),
            message_count: 1,
            feedback: FeedbackBody::Text("Good structure...".to_string()),
        }
    }

    #[test]
    fn test_export_layout() {
        let mut answer = Turn::pending_user("I would size the market first.");
        answer.status = rehearse_types::interview::TurnStatus::Confirmed;
        let turns = vec![
            Turn::interviewer("How many piano tuners are in Chicago?"),
            answer,
            Turn::interviewer("Walk me through it."),
        ];
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();

        let export = build_feedback_export(&persona(), &feedback(), &turns, at);

        assert_eq!(export.file_name, format!("interview-feedback-{}.txt", at.timestamp_millis()));
        assert!(export.content.starts_with("AI MOCK INTERVIEW FEEDBACK\n"));
        assert!(export.content.contains("Interviewer: Michael Torres\n"));
        assert!(export.content.contains("Duration: 05:12\n"));
        assert!(export.content.contains("FEEDBACK\n--------\nGood structure...\n"));
        assert!(export.content.contains("You:\nI would size the market first.\n"));
        assert!(export.content.ends_with("Generated on: 2026-10-18 09:30:00\n"));

        let opening = export.content.find("How many piano tuners").unwrap();
        let reply = export.content.find("Walk me through it.").unwrap();
        assert!(opening < reply);
    }

    #[test]
    fn test_export_skips_unconfirmed_turns() {
        let mut failed = Turn::pending_user("send errored");
        failed.status = rehearse_types::interview::TurnStatus::Failed;
        let turns = vec![
            Turn::interviewer("Opening"),
            failed,
            Turn::pending_user("never acknowledged"),
        ];
        let export = build_feedback_export(&persona(), &feedback(), &turns, Utc::now());
        assert!(!export.content.contains("never acknowledged"));
        assert!(!export.content.contains("send errored"));
    }
}
