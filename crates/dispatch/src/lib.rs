//! The single execution boundary every channel adapter calls.
//!
//! `Dispatcher::execute` takes a tool invocation and always returns a
//! well-formed [`ToolResult`]. Lookup misses, visibility denials,
//! argument violations, handler errors, panics, and timeouts all come
//! back as failure envelopes; nothing propagates to an adapter, because a
//! crashed dispatch would take down a live call or chat session.

mod validate;

pub use validate::validate_arguments;

use std::sync::Arc;

use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};

use gigi_catalog::Catalog;
use gigi_core::{ToolError, ToolInvocation, ToolResult};
use gigi_policy::{is_visible, ChannelOverrides};
use gigi_tools::{HandlerRegistry, ToolHandler};

/// Longest argument rendering that reaches the logs.
const LOGGED_ARGS_MAX: usize = 256;

pub struct Dispatcher {
    catalog: Arc<Catalog>,
    overrides: Arc<ChannelOverrides>,
    registry: Arc<HandlerRegistry>,
    timeout_ms: u64,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<Catalog>,
        overrides: Arc<ChannelOverrides>,
        registry: Arc<HandlerRegistry>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            catalog,
            overrides,
            registry,
            timeout_ms,
        }
    }

    /// Executes one invocation. Infallible by contract: every outcome is a
    /// ToolResult.
    pub async fn execute(&self, invocation: ToolInvocation) -> ToolResult {
        let ToolInvocation {
            tool_name,
            arguments,
            channel,
            context,
        } = invocation;

        info!(
            tool = %tool_name,
            %channel,
            conversation = %context.conversation_id,
            args = %logged_args(&arguments),
            "dispatching tool"
        );

        // 1. Catalog lookup.
        let def = match self.catalog.get(&tool_name) {
            Some(def) => def,
            None => {
                warn!(tool = %tool_name, %channel, "unknown tool");
                return ToolResult::fail(format!("unknown tool: {tool_name}"));
            }
        };

        // 2. Channel visibility: declared set and override list both apply.
        if !is_visible(def, channel, &self.overrides) {
            warn!(tool = %tool_name, %channel, "tool not visible on channel");
            return ToolResult::fail(format!(
                "tool '{tool_name}' is not available on the {channel} channel"
            ));
        }

        // 3. Argument validation against the declared parameters.
        if let Err(violation) = validate_arguments(def, &arguments) {
            warn!(tool = %tool_name, %channel, %violation, "argument validation failed");
            return ToolResult::fail(violation);
        }

        // Registry verification at startup makes a miss here unreachable,
        // but the contract still forbids surfacing it as anything but a
        // failure envelope.
        let handler = match self.registry.get(def.handler) {
            Some(h) => h,
            None => {
                error!(tool = %tool_name, key = def.handler, "handler key unresolved");
                return ToolResult::fail(format!("no handler registered for '{tool_name}'"));
            }
        };

        // 4-6. Guarded execution, then wrap.
        let result = self
            .run_handler(handler, &tool_name, arguments, channel, context)
            .await;
        if let Some(err) = &result.error {
            warn!(tool = %tool_name, %channel, error = %err, "tool dispatch failed");
        } else {
            info!(tool = %tool_name, %channel, "tool dispatch succeeded");
        }
        result
    }

    /// Runs the handler inside a spawned task with a wall-clock timeout, so
    /// a panicking or hanging handler is isolated from the calling adapter.
    async fn run_handler(
        &self,
        handler: Arc<dyn ToolHandler>,
        tool_name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
        channel: gigi_core::Channel,
        context: gigi_core::CallContext,
    ) -> ToolResult {
        let exec = async move { handler.execute(&arguments, channel, &context).await };
        let joined = timeout(Duration::from_millis(self.timeout_ms), tokio::spawn(exec)).await;

        match joined {
            Ok(Ok(Ok(value))) => ToolResult::ok(value),
            Ok(Ok(Err(ToolError::ExecutionPartial { message, partial }))) => {
                ToolResult::fail_with_partial(format!("Execution failed: {message}"), partial)
            }
            Ok(Ok(Err(err))) => ToolResult::fail(err.to_string()),
            Ok(Err(join_err)) => {
                if join_err.is_panic() {
                    error!(tool = %tool_name, "handler panicked");
                } else {
                    error!(tool = %tool_name, "handler task cancelled");
                }
                ToolResult::fail(ToolError::Internal.to_string())
            }
            Err(_) => ToolResult::fail(format!(
                "tool '{}' timed out after {} ms",
                tool_name, self.timeout_ms
            )),
        }
    }
}

fn logged_args(args: &serde_json::Map<String, serde_json::Value>) -> String {
    let mut rendered = serde_json::Value::Object(args.clone()).to_string();
    if rendered.len() > LOGGED_ARGS_MAX {
        let mut cut = LOGGED_ARGS_MAX;
        while cut > 0 && !rendered.is_char_boundary(cut) {
            cut -= 1;
        }
        rendered.truncate(cut);
        rendered.push_str("...");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gigi_catalog::{ParamKind, ParamSpec, ToolDefinition};
    use gigi_core::{CallContext, Channel};
    use serde_json::{json, Map, Value};

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        async fn execute(
            &self,
            args: &Map<String, Value>,
            _channel: Channel,
            _ctx: &CallContext,
        ) -> Result<Value, ToolError> {
            Ok(Value::Object(args.clone()))
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        async fn execute(
            &self,
            _args: &Map<String, Value>,
            _channel: Channel,
            _ctx: &CallContext,
        ) -> Result<Value, ToolError> {
            Err(ToolError::Execution("CRM is down".into()))
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl ToolHandler for PanickingHandler {
        async fn execute(
            &self,
            _args: &Map<String, Value>,
            _channel: Channel,
            _ctx: &CallContext,
        ) -> Result<Value, ToolError> {
            panic!("handler bug")
        }
    }

    struct SlowHandler;

    #[async_trait]
    impl ToolHandler for SlowHandler {
        async fn execute(
            &self,
            _args: &Map<String, Value>,
            _channel: Channel,
            _ctx: &CallContext,
        ) -> Result<Value, ToolError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(json!(null))
        }
    }

    struct PartialHandler;

    #[async_trait]
    impl ToolHandler for PartialHandler {
        async fn execute(
            &self,
            _args: &Map<String, Value>,
            _channel: Channel,
            _ctx: &CallContext,
        ) -> Result<Value, ToolError> {
            Err(ToolError::ExecutionPartial {
                message: "exited non-zero".into(),
                partial: json!({"output": "half a page"}),
            })
        }
    }

    fn dispatcher(timeout_ms: u64) -> Dispatcher {
        let defs = vec![
            ToolDefinition::new(
                "echo",
                "echoes",
                vec![
                    ParamSpec::required("message", ParamKind::String, "text"),
                    ParamSpec::optional("count", ParamKind::Integer, "repeat"),
                    ParamSpec::optional("care_type", ParamKind::String, "enum")
                        .with_allowed(&["companion", "personal"]),
                ],
                &Channel::ALL,
                "echo",
            ),
            ToolDefinition::new("fails", "always fails", vec![], &Channel::ALL, "fails"),
            ToolDefinition::new("panics", "always panics", vec![], &Channel::ALL, "panics"),
            ToolDefinition::new("slow", "never returns", vec![], &Channel::ALL, "slow"),
            ToolDefinition::new("partial", "partial failure", vec![], &Channel::ALL, "partial"),
            ToolDefinition::new(
                "caregiver_schedule",
                "sms-overridden",
                vec![],
                &Channel::ALL,
                "echo",
            ),
            ToolDefinition::new("voice_only", "voice only", vec![], &[Channel::Voice], "echo"),
        ];
        let catalog = Arc::new(Catalog::build(defs).unwrap());
        let mut registry = HandlerRegistry::new();
        registry
            .register("echo", Arc::new(EchoHandler))
            .register("fails", Arc::new(FailingHandler))
            .register("panics", Arc::new(PanickingHandler))
            .register("slow", Arc::new(SlowHandler))
            .register("partial", Arc::new(PartialHandler));
        Dispatcher::new(
            catalog,
            Arc::new(ChannelOverrides::default()),
            Arc::new(registry),
            timeout_ms,
        )
    }

    fn invocation(tool: &str, channel: Channel, args: Value) -> ToolInvocation {
        let arguments = match args {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        ToolInvocation {
            tool_name: tool.to_string(),
            arguments,
            channel,
            context: CallContext::new("+15550100", "conv-1"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_failure_envelope() {
        let result = dispatcher(5_000)
            .execute(invocation("nonexistent_tool", Channel::Chat, json!({})))
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("unknown tool"));
    }

    #[tokio::test]
    async fn undeclared_channel_is_not_available() {
        let result = dispatcher(5_000)
            .execute(invocation("voice_only", Channel::Chat, json!({})))
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("not available on the chat channel"));
    }

    #[tokio::test]
    async fn override_exclusion_is_not_available() {
        let d = dispatcher(5_000);
        let blocked = d
            .execute(invocation("caregiver_schedule", Channel::Sms, json!({})))
            .await;
        assert!(!blocked.success);
        // Same tool on a non-overridden channel goes through.
        let allowed = d
            .execute(invocation("caregiver_schedule", Channel::Voice, json!({})))
            .await;
        assert!(allowed.success);
    }

    #[tokio::test]
    async fn missing_required_parameter() {
        let result = dispatcher(5_000)
            .execute(invocation("echo", Channel::Chat, json!({})))
            .await;
        assert_eq!(
            result.error.as_deref(),
            Some("missing required parameter 'message'")
        );
    }

    #[tokio::test]
    async fn unknown_parameter_rejected() {
        let result = dispatcher(5_000)
            .execute(invocation(
                "echo",
                Channel::Chat,
                json!({"message": "hi", "bogus": 1}),
            ))
            .await;
        assert_eq!(result.error.as_deref(), Some("unknown parameter 'bogus'"));
    }

    #[tokio::test]
    async fn wrong_type_rejected() {
        let result = dispatcher(5_000)
            .execute(invocation("echo", Channel::Chat, json!({"message": 5})))
            .await;
        assert_eq!(
            result.error.as_deref(),
            Some("parameter 'message' must be a string")
        );
    }

    #[tokio::test]
    async fn enum_violation_rejected() {
        let result = dispatcher(5_000)
            .execute(invocation(
                "echo",
                Channel::Chat,
                json!({"message": "hi", "care_type": "surgical"}),
            ))
            .await;
        let err = result.error.unwrap();
        assert!(err.contains("care_type"));
        assert!(err.contains("surgical"));
    }

    #[tokio::test]
    async fn success_wraps_handler_value() {
        let result = dispatcher(5_000)
            .execute(invocation("echo", Channel::Sms, json!({"message": "hi"})))
            .await;
        assert!(result.success);
        assert_eq!(result.result.unwrap()["message"], "hi");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn handler_error_becomes_failure_envelope() {
        let result = dispatcher(5_000)
            .execute(invocation("fails", Channel::Chat, json!({})))
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("CRM is down"));
    }

    #[tokio::test]
    async fn handler_panic_becomes_failure_envelope() {
        let result = dispatcher(5_000)
            .execute(invocation("panics", Channel::Chat, json!({})))
            .await;
        assert!(!result.success);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn hanging_handler_times_out() {
        let result = dispatcher(100)
            .execute(invocation("slow", Channel::Chat, json!({})))
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn partial_output_survives_failure() {
        let result = dispatcher(5_000)
            .execute(invocation("partial", Channel::Chat, json!({})))
            .await;
        assert!(!result.success);
        assert_eq!(result.partial_output.unwrap()["output"], "half a page");
    }

    #[tokio::test]
    async fn concurrent_invocations_are_independent() {
        let d = Arc::new(dispatcher(5_000));
        let mut tasks = Vec::new();
        for i in 0..8 {
            let d = d.clone();
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    d.execute(invocation("echo", Channel::Sms, json!({"message": "hi"})))
                        .await
                } else {
                    d.execute(invocation("panics", Channel::Chat, json!({})))
                        .await
                }
            }));
        }
        for (i, task) in tasks.into_iter().enumerate() {
            let result = task.await.unwrap();
            assert_eq!(result.success, i % 2 == 0);
        }
    }

    #[test]
    fn logged_args_truncated() {
        let mut args = Map::new();
        args.insert("blob".into(), json!("x".repeat(1_000)));
        let rendered = logged_args(&args);
        assert!(rendered.len() <= LOGGED_ARGS_MAX + 3);
        assert!(rendered.ends_with("..."));
    }
}
