//! Terminal rendering for interviewer turns, errors, and feedback.
//!
//! Interviewer replies and feedback are rendered as markdown through
//! `termimad`; everything else is plain `console` styling.

use console::style;
use termimad::MadSkin;

use rehearse_core::clock::format_elapsed;
use rehearse_types::error::ControllerError;
use rehearse_types::event::ControllerEvent;
use rehearse_types::interview::{Feedback, SessionStatusReport};

pub struct InterviewRenderer {
    skin: MadSkin,
}

impl InterviewRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);
        Self { skin }
    }

    /// Render markdown text for the terminal.
    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print one interviewer turn under the persona's name.
    pub fn print_interviewer(&self, name: &str, content: &str) {
        println!();
        println!("  {}", style(name).cyan().bold());
        for line in self.render(content.trim()).lines() {
            println!("  {line}");
        }
        println!();
    }

    pub fn print_error(&self, err: &ControllerError) {
        eprintln!("\n  {} {err}", style("!").red().bold());
    }

    pub fn print_notice(&self, message: &str) {
        println!("\n  {} {message}", style("i").blue().bold());
    }

    pub fn print_status(&self, report: &SessionStatusReport, elapsed_secs: u64) {
        println!();
        println!("  {}  {}", style("Status:").bold(), report.status);
        println!("  {}  {}", style("Persona:").bold(), report.persona_id);
        println!("  {}  {}", style("Answers:").bold(), report.message_count);
        println!("  {}  {}", style("Elapsed:").bold(), format_elapsed(elapsed_secs));
        println!();
    }

    /// Print the feedback screen.
    pub fn print_feedback(&self, interviewer: &str, feedback: &Feedback) {
        println!();
        println!("  {}", style("Interview Feedback").bold().underlined());
        println!();
        println!("  {}  {}", style("Interviewer:").bold(), interviewer);
        println!("  {}  {}", style("Duration:").bold(), feedback.duration);
        println!("  {}  {}", style("Questions answered:").bold(), feedback.message_count);
        println!();
        for line in self.render(&feedback.feedback.to_plain_text()).lines() {
            println!("  {line}");
        }
        println!();
    }

    /// Print the controller events worth showing mid-interview.
    ///
    /// Returns the new elapsed seconds on a timer tick so the caller can
    /// refresh its prompt.
    pub fn handle_event(&self, event: &ControllerEvent) -> Option<u64> {
        match event {
            ControllerEvent::TimerTick { elapsed_secs } => return Some(*elapsed_secs),
            ControllerEvent::TurnFailed { .. } => {
                self.print_notice("Your answer may not have been delivered. Type /retry to send it again.");
            }
            ControllerEvent::SessionAbandoned { session_id } => {
                self.print_notice(&format!(
                    "Session {} was closed because your credential was rejected.",
                    style(session_id).dim()
                ));
            }
            _ => {}
        }
        None
    }
}

impl Default for InterviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Input prompt showing the interview clock.
pub fn prompt(elapsed_secs: u64) -> String {
    format!(
        "  {} {} ",
        style(format!("[{}]", format_elapsed(elapsed_secs))).dim(),
        style("You >").green().bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shows_clock() {
        let rendered = console::strip_ansi_codes(&prompt(312)).to_string();
        assert_eq!(rendered, "  [05:12] You > ");
    }

    #[test]
    fn test_render_keeps_text() {
        let renderer = InterviewRenderer::new();
        let rendered = renderer.render("Tell me about **yourself**.");
        let plain = console::strip_ansi_codes(&rendered);
        assert!(plain.contains("Tell me about"));
        assert!(plain.contains("yourself"));
    }

    #[test]
    fn test_timer_tick_returns_elapsed() {
        let renderer = InterviewRenderer::new();
        assert_eq!(renderer.handle_event(&ControllerEvent::TimerTick { elapsed_secs: 7 }), Some(7));
        assert_eq!(
            renderer.handle_event(&ControllerEvent::TurnConfirmed { index: 1 }),
            None
        );
    }
}
