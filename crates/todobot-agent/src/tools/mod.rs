//! The closed set of task tools the model may invoke.
//!
//! An `action` turn names a tool by string; [`TodoTool::from_action`] turns
//! it into a typed variant or a [`ToolError`] that the agent loop feeds back
//! to the model as an observation.

pub mod registry;

use thiserror::Error;

pub use registry::ToolRegistry;

// ─────────────────────────────────────────────
// Tool kinds
// ─────────────────────────────────────────────

/// One typed tool call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoTool {
    /// `getAllTodos()`
    GetAllTodos,
    /// `createTodo(todo: string)`
    CreateTodo { text: String },
    /// `deleteTodoById(id: string)`
    DeleteTodoById { id: i64 },
    /// `searchTodo(query: string)`
    SearchTodo { query: String },
}

/// Why an `action` turn could not become a [`TodoTool`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("invalid input for {tool}: {reason}")]
    InvalidInput { tool: &'static str, reason: String },
}

impl TodoTool {
    /// Resolve a model-requested function name and its string input.
    pub fn from_action(function: &str, input: &str) -> Result<Self, ToolError> {
        match function {
            "getAllTodos" => Ok(TodoTool::GetAllTodos),
            "createTodo" => {
                let text = input.trim();
                if text.is_empty() {
                    return Err(ToolError::InvalidInput {
                        tool: "createTodo",
                        reason: "todo text must not be empty".into(),
                    });
                }
                Ok(TodoTool::CreateTodo {
                    text: text.to_string(),
                })
            }
            "deleteTodoById" => {
                let id = input
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ToolError::InvalidInput {
                        tool: "deleteTodoById",
                        reason: format!("'{input}' is not an integer id"),
                    })?;
                Ok(TodoTool::DeleteTodoById { id })
            }
            "searchTodo" => Ok(TodoTool::SearchTodo {
                query: input.to_string(),
            }),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    /// The name the model uses for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            TodoTool::GetAllTodos => "getAllTodos",
            TodoTool::CreateTodo { .. } => "createTodo",
            TodoTool::DeleteTodoById { .. } => "deleteTodoById",
            TodoTool::SearchTodo { .. } => "searchTodo",
        }
    }
}

// ─────────────────────────────────────────────
// Prompt-facing descriptions
// ─────────────────────────────────────────────

/// How a tool is described to the model.
#[derive(Clone, Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    /// Call signature as shown in the prompt, e.g. `createTodo(todo: string)`.
    pub signature: &'static str,
    pub description: &'static str,
}

/// Every tool, in prompt order.
pub static TOOL_SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: "getAllTodos",
        signature: "getAllTodos()",
        description: "Returns all the todos from the database",
    },
    ToolSpec {
        name: "createTodo",
        signature: "createTodo(todo: string)",
        description: "Creates a new todo with the given text and returns the id of the created todo",
    },
    ToolSpec {
        name: "deleteTodoById",
        signature: "deleteTodoById(id: string)",
        description: "Deletes the todo with the given id",
    },
    ToolSpec {
        name: "searchTodo",
        signature: "searchTodo(query: string)",
        description: "Returns the todos whose text contains the query, ignoring case",
    },
];

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_action_each_tool() {
        assert_eq!(
            TodoTool::from_action("getAllTodos", "").unwrap(),
            TodoTool::GetAllTodos
        );
        assert_eq!(
            TodoTool::from_action("createTodo", " Buy milk ").unwrap(),
            TodoTool::CreateTodo {
                text: "Buy milk".into()
            }
        );
        assert_eq!(
            TodoTool::from_action("deleteTodoById", " 42").unwrap(),
            TodoTool::DeleteTodoById { id: 42 }
        );
        assert_eq!(
            TodoTool::from_action("searchTodo", "milk").unwrap(),
            TodoTool::SearchTodo {
                query: "milk".into()
            }
        );
    }

    #[test]
    fn test_get_all_ignores_input() {
        assert_eq!(
            TodoTool::from_action("getAllTodos", "whatever").unwrap(),
            TodoTool::GetAllTodos
        );
    }

    #[test]
    fn test_unknown_tool() {
        assert_eq!(
            TodoTool::from_action("updateTodo", "x"),
            Err(ToolError::UnknownTool("updateTodo".into()))
        );
        // Names are case-sensitive.
        assert!(matches!(
            TodoTool::from_action("getalltodos", ""),
            Err(ToolError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_invalid_delete_id() {
        for input in ["", "abc", "1.5", "one"] {
            let err = TodoTool::from_action("deleteTodoById", input).unwrap_err();
            assert!(
                matches!(err, ToolError::InvalidInput { tool: "deleteTodoById", .. }),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_empty_create_text() {
        let err = TodoTool::from_action("createTodo", "   ").unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput { tool: "createTodo", .. }));
    }

    #[test]
    fn test_specs_cover_every_tool() {
        assert_eq!(TOOL_SPECS.len(), 4);
        for spec in TOOL_SPECS {
            let tool = TodoTool::from_action(spec.name, "1").unwrap();
            assert_eq!(tool.name(), spec.name);
            assert!(spec.signature.starts_with(spec.name));
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ToolError::UnknownTool("fly".into()).to_string(),
            "unknown tool 'fly'"
        );
    }
}
