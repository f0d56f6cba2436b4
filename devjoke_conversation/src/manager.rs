//! Conversation manager for the joke bot.
//!
//! The `ConversationManager` runs one interaction at a time against a
//! session it is handed. It owns no session state itself, so a single
//! manager serves every client.

use crate::session::ConversationSession;
use devjoke_core::{
    DEFAULT_MODEL, LLMProvider, ProviderError, Role, SUGGESTIONS, StyleOptions, generate_reply,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration for conversation management.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// Model to use for completions
    pub model: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ConversationConfig {
    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

/// Errors that can occur while running a turn.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("{0}")]
    Completion(#[from] ProviderError),

    #[error("Input is empty")]
    EmptyInput,

    #[error("No suggestion at index {0}")]
    UnknownSuggestion(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the user submitted for one turn.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    /// Raw text from the chat input; used as the topics of the instruction
    pub user_input: String,
    /// Style widget values at submission time
    pub options: StyleOptions,
}

impl TurnInput {
    #[must_use]
    pub fn new(user_input: impl Into<String>, options: StyleOptions) -> Self {
        Self {
            user_input: user_input.into(),
            options,
        }
    }
}

/// Result of a successful turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Assistant's reply
    pub response: String,
    /// Token usage information
    pub usage: Option<TurnUsage>,
    /// Number of user turns in the session, this one included
    pub turn_number: usize,
}

/// Token usage information for a turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnUsage {
    pub prompt: u32,
    pub completion: u32,
    pub total: u32,
}

pub struct ConversationManager<P = Arc<dyn LLMProvider>>
where
    P: Send + Sync,
{
    provider: P,
    config: ConversationConfig,
}

impl<P> ConversationManager<P>
where
    P: LLMProvider + Send + Sync,
{
    pub fn new(provider: P, config: ConversationConfig) -> Self {
        info!("Creating conversation manager: model={}", config.model);
        Self { provider, config }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Process one chat submission.
    ///
    /// The contextual instruction, not the raw input, becomes the user turn.
    /// If the completion call fails that user turn stays in the history.
    pub async fn process_turn(
        &self,
        session: &mut ConversationSession,
        input: TurnInput,
    ) -> Result<TurnResult, ConversationError> {
        if input.user_input.trim().is_empty() {
            return Err(ConversationError::EmptyInput);
        }

        let options = input.options.clamped();
        let instruction = options.contextual_instruction(&input.user_input);
        session.add_message(Role::User, instruction);

        self.complete(session, &options).await
    }

    /// Append suggestion `index` verbatim as a user turn and answer it.
    pub async fn process_suggestion(
        &self,
        session: &mut ConversationSession,
        index: usize,
        options: StyleOptions,
    ) -> Result<TurnResult, ConversationError> {
        let suggestion = SUGGESTIONS
            .get(index)
            .ok_or(ConversationError::UnknownSuggestion(index))?;

        info!("Session {}: suggestion {index} selected", session.id);
        session.add_message(Role::User, (*suggestion).to_string());

        self.complete(session, &options.clamped()).await
    }

    async fn complete(
        &self,
        session: &mut ConversationSession,
        options: &StyleOptions,
    ) -> Result<TurnResult, ConversationError> {
        let turn_number = session.user_messages().len();
        info!("Processing turn {turn_number} for session: {}", session.id);

        let system_prompt = options.system_prompt();
        let reply = generate_reply(
            &self.provider,
            &session.messages,
            &system_prompt,
            &self.config.model,
        )
        .await
        .inspect_err(|e| warn!("Turn {turn_number} for session {} failed: {e}", session.id))?;

        session.add_message(Role::Assistant, reply.content.clone());
        debug!("Turn {turn_number} completed successfully");

        Ok(TurnResult {
            response: reply.content,
            usage: reply.usage.map(|u| TurnUsage {
                prompt: u.prompt_tokens,
                completion: u.completion_tokens,
                total: u.total_tokens,
            }),
            turn_number,
        })
    }

    /// Run an interactive conversation on stdin/stdout.
    pub async fn run_interactive(
        &self,
        session: &mut ConversationSession,
        options: &StyleOptions,
    ) -> Result<(), ConversationError> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run_with_io(session, options, stdin.lock(), stdout.lock())
            .await
    }

    async fn run_with_io<R, W>(
        &self,
        session: &mut ConversationSession,
        options: &StyleOptions,
        mut input: R,
        mut out: W,
    ) -> Result<(), ConversationError>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "=== Dev Joke Bot: session {} ===", session.id)?;
        writeln!(
            out,
            "Type a topic, '/suggest' for ideas, '/clear' to reset, 'exit' to quit.\n"
        )?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();

            if matches!(line, "exit" | "quit" | "q") {
                writeln!(
                    out,
                    "\nSession ended. Total turns: {}",
                    session.user_messages().len()
                )?;
                break;
            }

            if line.is_empty() {
                continue;
            }

            if line == "/clear" {
                session.clear();
                writeln!(out, "Chat cleared.\n")?;
                continue;
            }

            let result = if let Some(arg) = line.strip_prefix("/suggest") {
                match arg.trim().parse::<usize>() {
                    Ok(n) if n > 0 => {
                        self.process_suggestion(session, n - 1, options.clone())
                            .await
                    }
                    _ => {
                        writeln!(out, "Try a quick prompt:")?;
                        for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
                            writeln!(out, "  /suggest {}  {suggestion}", i + 1)?;
                        }
                        writeln!(out)?;
                        continue;
                    }
                }
            } else {
                self.process_turn(session, TurnInput::new(line, options.clone()))
                    .await
            };

            match result {
                Ok(result) => {
                    writeln!(out, "\n{}\n", result.response)?;

                    if let Some(usage) = result.usage {
                        debug!(
                            "Tokens: {} prompt + {} completion = {} total",
                            usage.prompt, usage.completion, usage.total
                        );
                    }
                }
                Err(e) => {
                    writeln!(out, "Error: {e}\n")?;
                }
            }
        }

        Ok(())
    }
}
