//! Where the credential comes from at login.
//!
//! Order: `--credential-stdin`, then the configured environment variable,
//! then a hidden interactive prompt. Piped and environment credentials are
//! offered once; only the interactive prompt can be retried after a
//! rejection.

use anyhow::{Context, Result};
use console::style;
use dialoguer::Password;
use tokio::io::AsyncBufReadExt;

use rehearse_infra::credential_source::EnvCredentialSource;
use rehearse_types::credential::CREDENTIAL_PREFIX;

pub struct CredentialPrompt {
    preset: Option<String>,
    interactive: bool,
}

impl CredentialPrompt {
    /// Resolve the credential sources for this run.
    pub async fn resolve(from_stdin: bool, env: &EnvCredentialSource) -> Result<Self> {
        if from_stdin {
            let mut line = String::new();
            tokio::io::BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await
                .context("failed to read credential from stdin")?;
            return Ok(Self::once(line));
        }

        if let Some(raw) = env.read() {
            println!(
                "  {} Using credential from {}",
                style("i").blue().bold(),
                style(env.var()).bold()
            );
            return Ok(Self {
                preset: Some(raw),
                interactive: console::user_attended(),
            });
        }

        Ok(Self {
            preset: None,
            interactive: true,
        })
    }

    /// A single credential with no interactive fallback.
    pub fn once(raw: impl Into<String>) -> Self {
        Self {
            preset: Some(raw.into()),
            interactive: false,
        }
    }

    /// Whether another credential can be asked for after a rejection.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// The next credential to try, or `None` when no source is left.
    pub fn next(&mut self) -> Result<Option<String>> {
        if let Some(raw) = self.preset.take() {
            return Ok(Some(raw));
        }
        if !self.interactive {
            return Ok(None);
        }

        let raw = Password::new()
            .with_prompt(format!(
                "Paste your OpenRouter key ({}...)",
                style(CREDENTIAL_PREFIX).bold()
            ))
            .allow_empty_password(true)
            .interact()?;
        Ok(Some(raw))
    }
}
