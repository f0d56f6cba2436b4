use devjoke_config::{API_KEY_ENV, Config};
use devjoke_core::{JokeStyle, SUGGESTIONS, StyleOptions};

/// Strategy for displaying the resolved configuration.
///
/// Prints the API key (masked) and where it came from, the completion
/// endpoint and model, the web server address and the default joke
/// settings.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== devjoke Configuration ===\n");

        let config_path = Config::config_path()?;
        let state = if config_path.exists() {
            "found"
        } else {
            "not found, using defaults"
        };
        println!("Config File: {} ({state})", config_path.display());
        println!();

        println!("API Key:");
        let source = if config.providers.openai.api_key.trim().is_empty() {
            API_KEY_ENV
        } else {
            "config file"
        };
        match config.resolve_api_key() {
            Ok(key) => println!("  OpenAI: {} (from {source})", mask_key(&key)),
            Err(_) => println!("  OpenAI: (not set)"),
        }
        println!();

        println!("Completion Service:");
        println!("  API Base: {}", config.providers.openai.api_base);
        println!("  Model: {}", config.agent.model);
        println!();

        println!("Web UI:");
        println!("  Address: http://{}", config.server.bind_address());
        println!("  Idle session TTL: {}s", config.server.session_ttl_secs);
        println!();

        let defaults = StyleOptions::default();
        println!("Joke Defaults:");
        println!("  Style: {}", defaults.style);
        println!("  Jokes: {}", defaults.joke_count);
        println!("  Family-friendly: {}", defaults.family_friendly);
        println!("  Explanations: {}", defaults.explain);
        let styles: Vec<&str> = JokeStyle::ALL.iter().map(|s| s.label()).collect();
        println!("  Styles: {}", styles.join(", "));
        println!("  Suggestions: {}", SUGGESTIONS.len());

        Ok(())
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_keys_show_ends_only() {
        assert_eq!(mask_key("sk-abcdefghijklmnop"), "sk-a...mnop");
    }

    #[test]
    fn short_keys_fully_hidden() {
        assert_eq!(mask_key("sk-1234"), "***");
        assert_eq!(mask_key(""), "***");
    }
}
