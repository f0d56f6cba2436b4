use crate::command::CommandStrategy;
use devjoke_config::Config;
use devjoke_web::{AppState, WebServer};
use std::time::Duration;
use tracing::info;

use super::build_manager;

/// Input for the web server command.
#[derive(Debug, Clone)]
pub struct ServeInput {
    /// Overrides `server.host`
    pub host: Option<String>,
    /// Overrides `server.port`
    pub port: Option<u16>,
    /// Overrides `agent.model`
    pub model: Option<String>,
}

/// Strategy for running the browser UI.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(host) = input.host {
            config.server.host = host;
        }
        if let Some(port) = input.port {
            config.server.port = port;
        }

        let manager = build_manager(&config, input.model)?;
        info!("Starting web UI with model {}", manager.model());

        let server = WebServer::new(AppState::new(manager))
            .with_session_ttl(Duration::from_secs(config.server.session_ttl_secs));
        server.run(&config.server.bind_address()).await?;

        Ok(())
    }
}
