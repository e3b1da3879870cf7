//! CLI module
//!
//! Command-line interface for the relay.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP relay
//! - `auth-url` - Print the Google consent URL
//! - `comments` - Fetch comment threads for one video

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{build_router, serve, serve_on, AppState, CONTENT_SECURITY_POLICY, WELCOME_MESSAGE};
