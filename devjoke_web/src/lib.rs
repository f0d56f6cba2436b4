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

//! Browser front end for the joke bot.
//!
//! Serves a single page plus a small JSON API. Each browser tab owns one
//! session in the [`SessionStore`]; every button press or chat submission is
//! one request handled start to finish by [`handler`].

mod error;
pub mod handler;
mod server;
mod session;

pub use error::{Error, Result};
pub use server::{AppState, DEFAULT_SESSION_TTL, WebServer};
pub use session::SessionStore;
