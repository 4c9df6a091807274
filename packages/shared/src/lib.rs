//! Utilities shared by the Puppet server and client binaries.

pub mod logger;
pub mod time;
