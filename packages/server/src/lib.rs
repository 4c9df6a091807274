//! Puppet room server library.
//!
//! Authenticated participants join a named room over WebSocket and exchange
//! short text messages, either broadcast to the room or addressed to specific
//! members. Administrators can delete a room, which closes every member's
//! connection.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
