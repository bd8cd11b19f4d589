//! Rehearse CLI entry point.
//!
//! Binary name: `rehearse`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! persona listing or the interactive interview.

mod cli;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG wins when set.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,rehearse=debug",
        _ => "trace",
    };
    if let Err(e) = rehearse_observe::tracing_setup::init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = match cli.command {
        // Shell completions don't need app state
        Commands::Completions { shell } => {
            cli::write_completions(shell, &mut std::io::stdout());
            Ok(())
        }
        Commands::Personas => {
            let state = AppState::init(cli.base_url).await?;
            cli::personas::list_personas(&state, cli.json).await
        }
        Commands::Interview {
            persona,
            credential_stdin,
        } => {
            let state = AppState::init(cli.base_url).await?;
            cli::interview::loop_runner::run_interview(&state, persona, credential_stdin).await
        }
    };

    rehearse_observe::tracing_setup::shutdown_tracing();
    result
}
