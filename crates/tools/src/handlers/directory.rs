use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::traits::ToolHandler;
use gigi_core::{CallContext, Channel, ToolError};
use gigi_executor::{AdminCliExecutor, ExecutorError};
use gigi_policy::CommandGuard;

#[derive(Deserialize)]
struct DirectoryQueryInput {
    query: String,
}

/// Forwards a free-form query to the read-only workspace admin CLI.
///
/// The guard validates the verb before anything is spawned; a rejected
/// query never reaches the executor.
pub struct DirectoryQueryHandler {
    guard: Arc<CommandGuard>,
    executor: Arc<AdminCliExecutor>,
}

impl DirectoryQueryHandler {
    pub fn new(guard: Arc<CommandGuard>, executor: Arc<AdminCliExecutor>) -> Self {
        Self { guard, executor }
    }
}

#[async_trait]
impl ToolHandler for DirectoryQueryHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        _channel: Channel,
        _ctx: &CallContext,
    ) -> Result<Value, ToolError> {
        let input: DirectoryQueryInput = serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| ToolError::Validation(e.to_string()))?;

        let tokens = self
            .guard
            .validate(&input.query)
            .map_err(|e| ToolError::PolicyRejected(e.to_string()))?;

        match self.executor.run(&tokens).await {
            Ok(output) => Ok(json!({ "output": output })),
            Err(ExecutorError::Timeout(ms)) => Err(ToolError::Execution(format!(
                "directory query timed out after {ms} ms"
            ))),
            Err(ExecutorError::CommandFailed {
                error,
                partial_stdout: Some(partial),
            }) => Err(ToolError::ExecutionPartial {
                message: error,
                partial: json!({ "output": partial }),
            }),
            Err(e) => Err(ToolError::Execution(e.to_string())),
        }
    }
}
