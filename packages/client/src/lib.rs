//! Puppet CLI client.
//!
//! Logs in over HTTP, joins a room over WebSocket and chats from the terminal.

pub mod api;
pub mod domain;
pub mod dto;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::{ClientConfig, run_client};
