//! Main interview loop orchestration.
//!
//! Drives the session controller through login, catalog, persona pick, the
//! question/answer loop, and the feedback screen. All state decisions are
//! the controller's; this module only reads its state after each action to
//! decide which screen comes next.

use std::time::Duration;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info};

use rehearse_core::controller::Completion;
use rehearse_types::event::ControllerEvent;
use rehearse_types::persona::Persona;
use rehearse_types::state::ControllerState;

use crate::state::{AppState, ConcreteController};

use super::banner::print_welcome_banner;
use super::commands::{self, InterviewCommand};
use super::feedback::{run_feedback_screen, AfterFeedback};
use super::input::{InputEvent, InterviewInput};
use super::login::CredentialPrompt;
use super::renderer::{prompt, InterviewRenderer};

/// How the question/answer loop ended.
enum ChatFlow {
    Feedback,
    LoggedOut,
    /// The service rejected the credential mid-interview.
    Rejected,
    Exit,
}

/// Outcome of a step that can bounce the user back to an earlier screen.
enum Step {
    Continue,
    PickAgain,
    Relogin,
    Quit,
}

/// Run the interactive interview until the user exits.
pub async fn run_interview(
    state: &AppState,
    mut requested_persona: Option<String>,
    credential_stdin: bool,
) -> Result<()> {
    let mut controller = state.controller();
    let mut events = controller.subscribe();
    let renderer = InterviewRenderer::new();
    let mut credentials = CredentialPrompt::resolve(credential_stdin, &state.credential_source()).await?;
    let export_dir = state.export_dir();
    let mut rejected = false;

    'login: loop {
        if !login(&mut controller, &mut credentials, &renderer, rejected)? {
            return Ok(());
        }
        rejected = false;

        match load_catalog(&mut controller, &renderer).await? {
            Step::Continue | Step::PickAgain => {}
            Step::Relogin => {
                rejected = true;
                continue 'login;
            }
            Step::Quit => return Ok(()),
        }

        loop {
            let persona_id = match requested_persona.take() {
                Some(id) => id,
                None => match pick_persona(controller.catalog())? {
                    Some(id) => id,
                    None => {
                        controller.logout();
                        return Ok(());
                    }
                },
            };

            match start(&mut controller, &renderer, &persona_id).await {
                Step::Continue => {}
                Step::PickAgain => continue,
                Step::Relogin => {
                    rejected = true;
                    continue 'login;
                }
                Step::Quit => return Ok(()),
            }

            match run_chat(&mut controller, &mut events, &renderer).await? {
                ChatFlow::Feedback => {}
                ChatFlow::LoggedOut => continue 'login,
                ChatFlow::Rejected => {
                    rejected = true;
                    continue 'login;
                }
                ChatFlow::Exit => return Ok(()),
            }

            match run_feedback_screen(&controller, &renderer, &export_dir).await? {
                AfterFeedback::NewInterview => controller.new_interview()?,
                AfterFeedback::Exit => {
                    controller.logout();
                    return Ok(());
                }
            }
        }
    }
}

/// Log in with the next available credential.
///
/// Returns `false` when the credential sources are exhausted after a
/// user logout. `rejected` marks a forced logout, which is an error once
/// no credential is left to try.
fn login(
    controller: &mut ConcreteController,
    credentials: &mut CredentialPrompt,
    renderer: &InterviewRenderer,
    rejected: bool,
) -> Result<bool> {
    loop {
        let Some(raw) = credentials.next()? else {
            if rejected {
                anyhow::bail!("credential rejected by the interview service");
            }
            return Ok(false);
        };

        match controller.login(&raw) {
            Ok(()) => {
                println!(
                    "  {} Logged in ({})",
                    style("✓").green().bold(),
                    style(controller.masked_credential().unwrap_or_default()).dim()
                );
                return Ok(true);
            }
            Err(e) => {
                renderer.print_error(&e);
                if !credentials.is_interactive() {
                    anyhow::bail!("{e}");
                }
            }
        }
    }
}

async fn load_catalog(controller: &mut ConcreteController, renderer: &InterviewRenderer) -> Result<Step> {
    loop {
        let spinner = spinner("Loading interview types...");
        let result = controller.load_catalog().await;
        spinner.finish_and_clear();

        match result {
            Ok(_) => return Ok(Step::Continue),
            Err(e) => {
                renderer.print_error(&e);
                if controller.state() == ControllerState::LoggedOut {
                    return Ok(Step::Relogin);
                }
                let retry = Confirm::new()
                    .with_prompt("Try again?")
                    .default(true)
                    .interact()?;
                if !retry {
                    controller.logout();
                    return Ok(Step::Quit);
                }
            }
        }
    }
}

/// Arrow-key persona picker. `None` means the user chose to quit.
fn pick_persona(catalog: &[Persona]) -> Result<Option<String>> {
    if catalog.is_empty() {
        anyhow::bail!("the interview service offers no personas");
    }

    let mut items: Vec<String> = catalog.iter().map(persona_label).collect();
    items.push("Quit".to_string());

    let selection = Select::new()
        .with_prompt("Choose your interviewer")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(catalog.get(selection).map(|p| p.id.clone()))
}

fn persona_label(persona: &Persona) -> String {
    let name = if persona.emoji.is_empty() {
        persona.name.clone()
    } else {
        format!("{} {}", persona.emoji, persona.name)
    };
    format!("{name} -- {}, {}", persona.title, persona.company)
}

async fn start(controller: &mut ConcreteController, renderer: &InterviewRenderer, persona_id: &str) -> Step {
    let spinner = spinner("Starting interview...");
    let result = controller.start_interview(persona_id).await;
    spinner.finish_and_clear();

    match result {
        Ok(_) => Step::Continue,
        Err(e) => {
            renderer.print_error(&e);
            match controller.state() {
                ControllerState::LoggedOut => Step::Relogin,
                // Catalog is still loaded; offer the picker again.
                ControllerState::CatalogReady => Step::PickAgain,
                _ => Step::Quit,
            }
        }
    }
}

/// The question/answer loop.
async fn run_chat(
    controller: &mut ConcreteController,
    events: &mut broadcast::Receiver<ControllerEvent>,
    renderer: &InterviewRenderer,
) -> Result<ChatFlow> {
    let Some(session) = controller.session() else {
        anyhow::bail!("no interview session is active");
    };
    let interviewer = session.persona().name.clone();
    print_welcome_banner(session.persona(), session.id());
    for turn in controller.transcript() {
        renderer.print_interviewer(&interviewer, &turn.content);
    }

    if let Some(draft) = controller.unsent_draft() {
        renderer.print_notice(&format!(
            "Your last answer was never delivered. Type /retry to send it now:\n    {}",
            style(draft).dim()
        ));
    }

    let (mut input, _writer) = InterviewInput::new(prompt(controller.elapsed_secs()))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let flow = loop {
        let event = tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(elapsed) = renderer.handle_event(&event) {
                            input.update_prompt(&prompt(elapsed));
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => debug!(skipped, "Event receiver lagged"),
                    Err(RecvError::Closed) => break ChatFlow::Exit,
                }
                continue;
            }
            line = input.read_line() => line,
        };

        let text = match event {
            InputEvent::Eof => {
                controller.logout();
                println!("\n  {}", style("Interview left without feedback.").dim());
                break ChatFlow::Exit;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D or type /exit to leave, /end for feedback.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        let answer = match commands::parse(&text) {
            None => text,
            Some(InterviewCommand::Help) => {
                commands::print_help();
                continue;
            }
            Some(InterviewCommand::Time) => {
                renderer.print_notice(&format!("Elapsed: {}", controller.elapsed_display()));
                continue;
            }
            Some(InterviewCommand::Status) => {
                match controller.refresh_status().await {
                    Ok(report) => renderer.print_status(&report, controller.elapsed_secs()),
                    Err(e) => renderer.print_error(&e),
                }
                if controller.state() == ControllerState::LoggedOut {
                    break ChatFlow::Rejected;
                }
                continue;
            }
            Some(InterviewCommand::Retry) => match controller.take_unsent_draft() {
                Some(draft) => draft,
                None => {
                    renderer.print_notice("Nothing to resend.");
                    continue;
                }
            },
            Some(InterviewCommand::End) => {
                let spinner = spinner("Generating your feedback...");
                let result = controller.end_interview().await;
                spinner.finish_and_clear();
                match result {
                    Ok(_) => break ChatFlow::Feedback,
                    Err(e) => {
                        renderer.print_error(&e);
                        if controller.state() == ControllerState::LoggedOut {
                            break ChatFlow::Rejected;
                        }
                        continue;
                    }
                }
            }
            Some(InterviewCommand::Logout) => {
                controller.logout();
                renderer.print_notice("Logged out.");
                break ChatFlow::LoggedOut;
            }
            Some(InterviewCommand::Exit) => {
                controller.logout();
                println!("\n  {}", style("Interview left without feedback.").dim());
                break ChatFlow::Exit;
            }
            Some(InterviewCommand::Unknown(name)) => {
                println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                );
                continue;
            }
        };

        let spinner = spinner(&format!("{interviewer} is thinking..."));
        let result = controller.send_message(&answer).await;
        spinner.finish_and_clear();

        match result {
            Ok(Completion::Applied) => {
                if let Some(reply) = controller.transcript().last() {
                    renderer.print_interviewer(&interviewer, &reply.content);
                }
            }
            Ok(Completion::Discarded) => {}
            Err(e) => {
                renderer.print_error(&e);
                if controller.state() == ControllerState::LoggedOut {
                    break ChatFlow::Rejected;
                }
            }
        }
    };

    input.finish();
    // Surface failed-turn/abandon notices published by the last action.
    while let Ok(event) = events.try_recv() {
        renderer.handle_event(&event);
    }
    info!(elapsed = %controller.elapsed_display(), "Interview loop finished");
    Ok(flow)
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
