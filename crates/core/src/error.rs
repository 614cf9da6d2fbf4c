use thiserror::Error;

/// Errors a tool handler or the dispatcher can produce. The dispatcher
/// converts every variant into a failure [`crate::ToolResult`]; none of
/// these ever cross the adapter boundary as a raw error.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Policy rejected command: {0}")]
    PolicyRejected(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    /// Execution failure that still produced usable diagnostic output.
    #[error("Execution failed: {message}")]
    ExecutionPartial {
        message: String,
        partial: serde_json::Value,
    },

    #[error("Operation timed out")]
    Timeout,

    #[error("Internal error")]
    Internal,
}
