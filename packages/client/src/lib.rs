//! Terminal client for the LAN chat relay.
//!
//! Connects to a relay, logs in with a username, sends chat lines and files
//! typed at the prompt and renders whatever the relay delivers.

pub mod command;
pub mod domain;
pub mod download;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
pub use session::run_client_session;
