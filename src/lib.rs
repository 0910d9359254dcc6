//! Knowhub - client for a knowledge-sharing article service
//!
//! The library holds the session and token handling, typed HTTP gateways for
//! the article, auth and AI endpoints, route protection, and the view
//! controllers the `knowhub` binary drives.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod token;
pub mod views;

#[cfg(test)]
mod test_utils;

// Re-export Args for the binary
pub use cli::Args;
pub use client::ApiClient;
pub use error::{ApiError, ValidationError};
pub use session::SessionManager;
