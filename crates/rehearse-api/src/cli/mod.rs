//! CLI command definitions for the `rehearse` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod interview;
pub mod personas;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Practice job interviews against AI interviewer personas.
#[derive(Parser)]
#[command(name = "rehearse", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Interview service URL (overrides config.toml).
    #[arg(long, env = "REHEARSE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available interviewer personas.
    #[command(alias = "ls")]
    Personas,

    /// Log in and run an interactive mock interview.
    Interview {
        /// Start straight away with this persona id.
        #[arg(short, long)]
        persona: Option<String>,

        /// Read the credential from the first line of stdin.
        #[arg(long)]
        credential_stdin: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Write the completion script for `shell`. Needs no app state.
pub fn write_completions(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = <Cli as clap::CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "rehearse", out);
}
