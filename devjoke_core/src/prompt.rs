//! Prompt construction for the joke bot.
//!
//! Everything here is a pure function of the user's style options. Unknown
//! style labels fall back to a default clause instead of failing.

use serde::{Deserialize, Serialize};

const PERSONA: &str = "You are a witty, friendly comedian AI who tells programming-related jokes.";
const FAMILY_FRIENDLY: &str =
    "Keep it clean, inclusive, and family-friendly. Avoid offensive, derogatory, or NSFW content.";
const EXPLAIN: &str =
    "Optionally add a very brief one-line explanation after each joke, labeled 'Why: ...'.";
const NO_EXPLAIN: &str = "Do not add any explanations, only the jokes.";
const CLOSING_NOTE: &str =
    "Keep jokes concise. Prefer original twists. Avoid repeating the same pattern.";

/// Clause used for any style label outside [`JokeStyle::ALL`].
pub const DEFAULT_STYLE_INSTRUCTION: &str = "Use any playful style that suits the topic.";

/// Returned by [`build_contextual_instruction`] when neither theme nor topics are given.
pub const FALLBACK_INSTRUCTION: &str =
    "Tell programming jokes. If no topic is given, pick common developer themes.";

/// Canned prompts offered while the conversation is still empty.
pub const SUGGESTIONS: [&str; 6] = [
    "Tell me a Python joke",
    "Jokes about debugging",
    "Make a pun about Git",
    "Frontend vs backend joke",
    "Cloud ops humor",
    "SQL jokes",
];

pub const MIN_JOKES: u32 = 1;
pub const MAX_JOKES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokeStyle {
    SurpriseMe,
    OneLiners,
    DadJokes,
    Puns,
    GentleRoasts,
    Haiku,
}

impl JokeStyle {
    /// Selector order.
    pub const ALL: [Self; 6] = [
        Self::SurpriseMe,
        Self::OneLiners,
        Self::DadJokes,
        Self::Puns,
        Self::GentleRoasts,
        Self::Haiku,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SurpriseMe => "Surprise me",
            Self::OneLiners => "One-liners",
            Self::DadJokes => "Dad jokes",
            Self::Puns => "Puns",
            Self::GentleRoasts => "Roasts (gentle)",
            Self::Haiku => "Haiku",
        }
    }

    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::SurpriseMe => DEFAULT_STYLE_INSTRUCTION,
            Self::OneLiners => "Prefer ultra-short, punchy one-liners.",
            Self::DadJokes => "Lean into wholesome, groan-worthy dad-joke energy.",
            Self::Puns => "Favor wordplay and puns.",
            Self::GentleRoasts => {
                "Do lighthearted, gentle roasts about code or tools without attacking people."
            }
            Self::Haiku => {
                "Format jokes as haiku. Keep syllable balance approximate, content humorous."
            }
        }
    }

    /// Look up a style by its selector label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.label() == label)
    }
}

/// Instruction clause for a style label, falling back to the default clause.
#[must_use]
pub fn style_instruction(label: &str) -> &'static str {
    JokeStyle::from_label(label).map_or(DEFAULT_STYLE_INSTRUCTION, JokeStyle::instruction)
}

/// Build the system-level instruction sent ahead of every request.
///
/// `joke_count` is not range checked here.
#[must_use]
pub fn build_system_prompt(
    style: &str,
    joke_count: u32,
    family_friendly: bool,
    explain: bool,
) -> String {
    let ff = if family_friendly { FAMILY_FRIENDLY } else { "" };
    let explain_instr = if explain { EXPLAIN } else { NO_EXPLAIN };
    let style_instr = style_instruction(style);

    format!(
        "{PERSONA}\n\
         {ff}\n\
         Style preference: {style_instr}\n\
         Number of jokes: {joke_count} (separate jokes with blank lines).\n\
         {explain_instr}\n\
         {CLOSING_NOTE}"
    )
}

/// Build the text that stands in for the user's raw input.
#[must_use]
pub fn build_contextual_instruction(language_theme: &str, topics: &str) -> String {
    let mut extras = Vec::with_capacity(2);

    let theme = language_theme.trim();
    if !theme.is_empty() {
        extras.push(format!(
            "Focus on the programming language or stack: {theme}."
        ));
    }

    let topics = topics.trim();
    if !topics.is_empty() {
        extras.push(format!("User requested topic/keywords: {topics}."));
    }

    if extras.is_empty() {
        return FALLBACK_INSTRUCTION.to_string();
    }
    extras.join(" ")
}

/// Current values of the style widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub style: String,
    pub joke_count: u32,
    pub family_friendly: bool,
    pub explain: bool,
    /// Optional language or stack to focus on; blank means none.
    pub theme: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            style: JokeStyle::SurpriseMe.label().to_string(),
            joke_count: 2,
            family_friendly: true,
            explain: false,
            theme: String::new(),
        }
    }
}

impl StyleOptions {
    /// Clamp the joke count into the range the UI offers.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.joke_count = self.joke_count.clamp(MIN_JOKES, MAX_JOKES);
        self
    }

    #[must_use]
    pub fn system_prompt(&self) -> String {
        build_system_prompt(
            &self.style,
            self.joke_count,
            self.family_friendly,
            self.explain,
        )
    }

    #[must_use]
    pub fn contextual_instruction(&self, topics: &str) -> String {
        build_contextual_instruction(&self.theme, topics)
    }
}
