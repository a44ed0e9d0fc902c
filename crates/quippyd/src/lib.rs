//! Quippy daemon library - exposes modules for testing.

pub mod conversation;
pub mod provider;
pub mod routes;
pub mod scanner;
pub mod server;
pub mod startup;
