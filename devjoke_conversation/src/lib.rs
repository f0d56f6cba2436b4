#![warn(
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

//! Per-session conversation handling for the joke bot.
//!
//! A [`ConversationSession`] is the turn list of one client. The
//! [`ConversationManager`] runs one interaction against a session passed in by
//! reference: it builds the prompts from the current style options, appends
//! the user turn, calls the completion service and appends the reply.
//!
//! # Key Features
//! - Contextual instruction substituted for the raw user input
//! - Canned suggestion turns
//! - No rollback of the user turn when the completion call fails
//! - Interactive terminal loop

mod manager;
#[cfg(test)]
mod mock;
mod session;

pub use manager::{
    ConversationConfig, ConversationError, ConversationManager, TurnInput, TurnResult, TurnUsage,
};
pub use session::ConversationSession;
