//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use devjoke_config::Config;
use devjoke_conversation::{ConversationConfig, ConversationManager};
use devjoke_core::LLMProvider;
use devjoke_providers::OpenAIProvider;
use std::sync::Arc;
use tracing::info;

mod chat;
mod info;
mod init;
mod serve;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use serve::{ServeInput, ServeStrategy};
pub use version::VersionStrategy;

/// Build the provider and conversation manager shared by `chat` and `serve`.
fn build_manager(config: &Config, model: Option<String>) -> anyhow::Result<ConversationManager> {
    let api_key = config.resolve_api_key()?;
    let provider = OpenAIProvider::new(api_key)
        .with_base_url(config.providers.openai.api_base.clone());
    info!("Completion endpoint: {}", provider.base_url());

    let model = model
        .into_iter()
        .chain(std::iter::once(config.agent.model.clone()))
        .map(|model| model.trim().to_string())
        .find(|model| !model.is_empty())
        .unwrap_or_else(|| provider.get_default_model().to_string());

    let provider: Arc<dyn LLMProvider> = Arc::new(provider);
    let conversation_config = ConversationConfig::default().with_model(model);

    Ok(ConversationManager::new(provider, conversation_config))
}

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         // Command logic here
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
