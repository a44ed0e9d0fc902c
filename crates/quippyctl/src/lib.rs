//! Quippy control library - client, display and chat loop.

pub mod client;
pub mod display;
pub mod repl;
