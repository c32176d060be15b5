//! Todobot Core: shared types, the conversation log, and configuration.
//!
//! This crate contains:
//! - **types**: chat messages and the structured turn protocol
//! - **conversation**: the append-only message log owned by the agent loop
//! - **config**: schema, file loading, and env var overrides
//! - **utils**: data paths and string helpers

pub mod config;
pub mod conversation;
pub mod types;
pub mod utils;

pub use conversation::{Conversation, ConversationError};
pub use types::{Message, ParseError, TurnMessage};
