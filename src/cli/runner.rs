//! CLI runner - executes commands

use crate::auth::{AccessToken, GoogleOAuth};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server::{self, AppState};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::pagination::{resolve_target, within_budget, Accumulator};
use crate::youtube::YouTubeClientProvider;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = AppConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Serve { port } => self.serve(config, *port).await,
            Commands::AuthUrl => self.auth_url(&config),
            Commands::Comments {
                video_id,
                access_token,
                max_results,
            } => {
                self.comments(config, video_id, access_token, *max_results)
                    .await
            }
        }
    }

    async fn serve(&self, config: AppConfig, port: Option<u16>) -> Result<()> {
        let port = port.unwrap_or(config.port);
        let state = AppState::new(config)?;
        server::serve(state, port).await
    }

    fn auth_url(&self, config: &AppConfig) -> Result<()> {
        let oauth = GoogleOAuth::new(config.oauth_client()?)?;
        let url = oauth.authorization_url()?;
        self.output(&json!({ "url": url.as_str() }))
    }

    /// Run one accumulation; Ctrl-C cancels it
    async fn comments(
        &self,
        config: AppConfig,
        video_id: &str,
        access_token: &str,
        max_results: Option<i64>,
    ) -> Result<()> {
        if video_id.trim().is_empty() {
            return Err(Error::config("--video-id must not be empty"));
        }

        let target = resolve_target(max_results, config.default_max_results);
        let provider = YouTubeClientProvider::new(config.http_client_config())?;
        let client = provider.get_client(AccessToken::new(access_token));

        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, cancelling fetch");
                    cancel.cancel();
                }
            }
        });

        let accumulator = Accumulator::with_cancellation(cancel);
        let outcome = within_budget(
            config.request_timeout(),
            client.fetch_comments(&accumulator, video_id, target),
        )
        .await;
        watcher.abort();

        let threads =
            outcome.map_err(|e| Error::Other(format!("Failed to fetch comment threads: {e}")))?;
        debug!(count = threads.len(), "Printing comment threads");
        self.output(&threads)
    }

    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
