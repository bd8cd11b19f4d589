//! Welcome banner display for interview sessions.

use console::style;

use rehearse_types::persona::Persona;

/// Print the banner at the start of an interview.
pub fn print_welcome_banner(persona: &Persona, session_id: &str) {
    let emoji = if persona.emoji.is_empty() { "*" } else { persona.emoji.as_str() };

    println!();
    println!("  {} {}", emoji, style(&persona.name).cyan().bold());
    println!("  {}", style(format!("{}, {}", persona.title, persona.company)).dim());
    if !persona.description.is_empty() {
        println!("  {}", style(&persona.description).dim());
    }
    println!();
    println!("  {}  {}", style("Session:").bold(), style(short_id(session_id)).dim());
    println!();
    println!("  {}", style("Type /help for commands, /end for feedback").dim());
    println!("  {}", style("---").dim());
    println!();
}

/// First 12 characters of a session id, char-safe.
fn short_id(session_id: &str) -> &str {
    match session_id.char_indices().nth(12) {
        Some((index, _)) => &session_id[..index],
        None => session_id,
    }
}
