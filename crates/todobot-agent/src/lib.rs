//! Todobot Agent: control loop, tools, and system prompt.
//!
//! This crate contains:
//! - **tools**: the closed set of task tools and their dispatcher
//! - **context**: system prompt construction
//! - **agent_loop**: the model ↔ tool control loop

pub mod agent_loop;
pub mod context;
pub mod tools;

pub use agent_loop::{AgentError, AgentLoop};
pub use context::build_system_prompt;
pub use tools::{TodoTool, ToolError, ToolRegistry, TOOL_SPECS};
