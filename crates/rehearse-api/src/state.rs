//! Application state shared by the CLI commands.
//!
//! Holds the resolved configuration and builds the concrete infra pieces
//! (HTTP transport, credential source) the commands need.

use std::path::PathBuf;

use tracing::debug;

use rehearse_core::controller::SessionController;
use rehearse_infra::config::{load_client_config, resolve_data_dir, resolve_export_dir};
use rehearse_infra::credential_source::EnvCredentialSource;
use rehearse_infra::http::HttpInterviewTransport;
use rehearse_types::config::ClientConfig;

/// The session controller pinned to the HTTP transport.
pub type ConcreteController = SessionController<HttpInterviewTransport>;

pub struct AppState {
    pub config: ClientConfig,
}

impl AppState {
    /// Load `config.toml` and apply the command-line base URL override.
    pub async fn init(base_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = load_client_config(&data_dir).await;
        if let Some(url) = base_url {
            config.base_url = url;
        }
        if config.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        debug!(
            data_dir = %data_dir.display(),
            base_url = %config.base_url,
            "Configuration loaded"
        );

        Ok(Self { config })
    }

    pub fn transport(&self) -> HttpInterviewTransport {
        HttpInterviewTransport::from_config(&self.config)
    }

    pub fn controller(&self) -> ConcreteController {
        SessionController::new(self.transport())
    }

    pub fn credential_source(&self) -> EnvCredentialSource {
        EnvCredentialSource::new(self.config.credential_env.clone())
    }

    pub fn export_dir(&self) -> PathBuf {
        resolve_export_dir(&self.config)
    }
}
