#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    ChatInput, ChatStrategy, CommandStrategy, InfoStrategy, InitStrategy, ServeInput,
    ServeStrategy, VersionStrategy,
};
use devjoke_core::StyleOptions;
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

#[derive(Parser)]
#[command(name = "devjoke")]
#[command(about = "Dev Joke Bot: a chatbot that tells programming jokes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web UI
    Serve {
        /// Address to bind (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,
    },
    /// Chat in the terminal
    Chat {
        /// Single message to send
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Joke style, e.g. "Puns" or "Haiku"
        #[arg(short, long, default_value = "Surprise me")]
        style: String,

        /// How many jokes per reply
        #[arg(short = 'n', long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=5))]
        jokes: u32,

        /// Allow jokes that are not family-friendly
        #[arg(long)]
        no_family_friendly: bool,

        /// Add a one-line explanation after each joke
        #[arg(short, long)]
        explain: bool,

        /// Language or stack to focus on
        #[arg(short, long, default_value = "")]
        theme: String,
    },
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, model } => {
            ServeStrategy
                .execute(ServeInput { host, port, model })
                .await?;
        }
        Commands::Chat {
            message,
            model,
            style,
            jokes,
            no_family_friendly,
            explain,
            theme,
        } => {
            let options = StyleOptions {
                style,
                joke_count: jokes,
                family_friendly: !no_family_friendly,
                explain,
                theme,
            };
            ChatStrategy
                .execute(ChatInput {
                    message,
                    model,
                    options,
                })
                .await?;
        }
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn chat_defaults_match_widget_defaults() {
        let cli = Cli::try_parse_from(["devjoke", "chat", "-m", "SQL"]).unwrap();
        let Commands::Chat {
            message,
            style,
            jokes,
            no_family_friendly,
            explain,
            theme,
            ..
        } = cli.command
        else {
            panic!("expected chat command");
        };
        let defaults = StyleOptions::default();
        assert_eq!(message.as_deref(), Some("SQL"));
        assert_eq!(style, defaults.style);
        assert_eq!(jokes, defaults.joke_count);
        assert_eq!(!no_family_friendly, defaults.family_friendly);
        assert_eq!(explain, defaults.explain);
        assert_eq!(theme, defaults.theme);
    }

    #[test]
    fn joke_count_is_range_checked() {
        assert!(Cli::try_parse_from(["devjoke", "chat", "-n", "6"]).is_err());
        assert!(Cli::try_parse_from(["devjoke", "chat", "-n", "5"]).is_ok());
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::try_parse_from(["devjoke", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: Some(9000),
                host: None,
                ..
            }
        ));
    }
}
