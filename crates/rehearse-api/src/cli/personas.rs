//! `rehearse personas`: list the interviewer catalog.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use rehearse_core::transport::InterviewTransport;
use rehearse_types::credential::Credential;
use rehearse_types::persona::Persona;

use crate::state::AppState;

/// Fetch and print the persona catalog.
///
/// The catalog needs no login; a credential from the environment is
/// attached when one is configured and well-formed.
pub async fn list_personas(state: &AppState, json: bool) -> Result<()> {
    let credential = state
        .credential_source()
        .read()
        .and_then(|raw| Credential::parse(&raw).ok());

    let personas = state
        .transport()
        .list_personas(credential.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load interview types: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&personas)?);
        return Ok(());
    }

    if personas.is_empty() {
        println!();
        println!(
            "  {} The interview service offers no personas right now.",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", persona_table(&personas));
    println!();
    println!(
        "  {} persona{}. Start one with {}",
        style(personas.len()).bold(),
        if personas.len() == 1 { "" } else { "s" },
        style("rehearse interview --persona <ID>").cyan()
    );
    println!();

    Ok(())
}

fn persona_table(personas: &[Persona]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Interviewer").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Focus").fg(Color::White),
    ]);

    for persona in personas {
        let name = if persona.emoji.is_empty() {
            persona.name.clone()
        } else {
            format!("{} {}", persona.emoji, persona.name)
        };
        table.add_row(vec![
            Cell::new(&persona.id).fg(Color::Cyan),
            Cell::new(name).fg(Color::White),
            Cell::new(format!("{}, {}", persona.title, persona.company)).fg(Color::DarkGrey),
            Cell::new(&persona.description).fg(Color::DarkGrey),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_persona() {
        let personas = vec![
            Persona {
                id: "mit".to_string(),
                emoji: "🎓".to_string(),
                name: "Dr. Sarah Chen".to_string(),
                title: "Admissions Officer".to_string(),
                company: "MIT".to_string(),
                description: "Practice for university admissions".to_string(),
            },
            Persona {
                id: "hr".to_string(),
                emoji: String::new(),
                name: "Lisa Patel".to_string(),
                title: "HR Director".to_string(),
                company: "Fortune 500 Corp".to_string(),
                description: String::new(),
            },
        ];

        let rendered = persona_table(&personas).to_string();
        assert!(rendered.contains("mit"));
        assert!(rendered.contains("🎓 Dr. Sarah Chen"));
        assert!(rendered.contains("HR Director, Fortune 500 Corp"));
    }
}
