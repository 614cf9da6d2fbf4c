use async_trait::async_trait;
use serde_json::{Map, Value};

use gigi_core::{CallContext, Channel, ToolError};

/// One executable tool implementation.
///
/// Handlers receive arguments the dispatcher has already validated against
/// the tool's declared parameters, plus the originating channel and call
/// context. They return a structured payload or a [`ToolError`]; the
/// dispatcher owns wrapping either into the result envelope.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        channel: Channel,
        ctx: &CallContext,
    ) -> Result<Value, ToolError>;
}
