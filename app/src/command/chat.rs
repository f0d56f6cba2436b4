//! Joke conversation in the terminal.
//!
//! Uses the same session loop as the web UI, with style options taken
//! from the command line.

use devjoke_config::Config;
use devjoke_conversation::{ConversationSession, TurnInput};
use devjoke_core::StyleOptions;
use tracing::info;

use super::build_manager;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional model override
    pub model: Option<String>,
    /// Style widget values
    pub options: StyleOptions,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let manager = build_manager(&config, input.model)?;
        let mut session = ConversationSession::new();

        info!("Starting conversation session: {}", session.id);

        if let Some(msg) = input.message {
            let result = manager
                .process_turn(&mut session, TurnInput::new(msg, input.options))
                .await?;
            println!("{}", result.response);
        } else {
            manager.run_interactive(&mut session, &input.options).await?;
            info!(
                "Conversation ended: {} total messages",
                session.message_count()
            );
        }

        Ok(())
    }
}
