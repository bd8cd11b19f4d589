//! Slash command parsing for the interview loop.
//!
//! Commands start with `/`; anything else is an answer to the interviewer.

use console::style;

/// Available slash commands during an interview.
#[derive(Debug, PartialEq)]
pub enum InterviewCommand {
    /// Show available commands.
    Help,
    /// Finish the interview and request feedback.
    End,
    /// Ask the service about this session.
    Status,
    /// Show the elapsed interview time.
    Time,
    /// Resend the last message that did not reach the interviewer.
    Retry,
    /// Forget the credential and return to login.
    Logout,
    /// Leave without feedback.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<InterviewCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(InterviewCommand::Help),
        "/end" | "/done" => Some(InterviewCommand::End),
        "/status" => Some(InterviewCommand::Status),
        "/time" => Some(InterviewCommand::Time),
        "/retry" => Some(InterviewCommand::Retry),
        "/logout" => Some(InterviewCommand::Logout),
        "/exit" | "/quit" | "/q" => Some(InterviewCommand::Exit),
        other => Some(InterviewCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}    {}", style("/help").cyan(), "Show this help message");
    println!("  {}     {}", style("/end").cyan(), "End the interview and get feedback");
    println!("  {}  {}", style("/status").cyan(), "Check the session with the service");
    println!("  {}    {}", style("/time").cyan(), "Show elapsed interview time");
    println!("  {}   {}", style("/retry").cyan(), "Resend your last undelivered answer");
    println!("  {}  {}", style("/logout").cyan(), "Forget your credential and log in again");
    println!("  {}    {}", style("/exit").cyan(), "Leave without feedback");
    println!();
    println!("  {}", style("Ctrl+D to leave, Ctrl+C is safe").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(InterviewCommand::Help));
        assert_eq!(parse("/h"), Some(InterviewCommand::Help));
        assert_eq!(parse("/?"), Some(InterviewCommand::Help));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse("/end"), Some(InterviewCommand::End));
        assert_eq!(parse("/done"), Some(InterviewCommand::End));
        assert_eq!(parse("/status"), Some(InterviewCommand::Status));
        assert_eq!(parse("/time"), Some(InterviewCommand::Time));
        assert_eq!(parse("/retry"), Some(InterviewCommand::Retry));
        assert_eq!(parse("/logout"), Some(InterviewCommand::Logout));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(InterviewCommand::Exit));
        assert_eq!(parse("/quit"), Some(InterviewCommand::Exit));
        assert_eq!(parse("/q"), Some(InterviewCommand::Exit));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_ignores_args() {
        assert_eq!(parse("  /END now"), Some(InterviewCommand::End));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("I led a team of five."), None);
        assert_eq!(parse("and/or"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(InterviewCommand::Unknown("/foo".to_string())));
    }
}
