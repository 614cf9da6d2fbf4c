//! Chat adapter: `!gigi <tool> {json args}` commands from the team chat.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::ChannelError;
use gigi_core::{CallContext, Channel, ToolInvocation, ToolResult};
use gigi_dispatch::Dispatcher;

const COMMAND_PREFIX: &str = "!gigi";

pub struct ChatAdapter {
    dispatcher: Arc<Dispatcher>,
}

impl ChatAdapter {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handles one chat message. Returns `None` when the message is not a
    /// Gigi command at all; parse failures and dispatch failures both come
    /// back as a rendered reply.
    pub async fn handle_message(
        &self,
        user: &str,
        channel_id: &str,
        text: &str,
    ) -> Option<String> {
        let rest = text.trim().strip_prefix(COMMAND_PREFIX)?;

        let (tool_name, arguments) = match parse_command(rest) {
            Ok(parsed) => parsed,
            Err(e) => return Some(format!("Couldn't read that command: {e}")),
        };

        info!(user, channel_id, tool = %tool_name, "chat tool command");

        let invocation = ToolInvocation {
            tool_name,
            arguments,
            channel: Channel::Chat,
            context: CallContext::new(user, channel_id),
        };
        let result = self.dispatcher.execute(invocation).await;
        Some(render_chat(&result))
    }
}

/// Splits `<tool> {json args}` after the command prefix. The argument
/// object is optional.
fn parse_command(rest: &str) -> Result<(String, Map<String, Value>), ChannelError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ChannelError::MalformedPayload {
            channel: "chat",
            reason: "expected a tool name after the command prefix".into(),
        });
    }

    let (tool_name, args_text) = match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], rest[i..].trim()),
        None => (rest, ""),
    };

    let arguments = if args_text.is_empty() {
        Map::new()
    } else {
        match serde_json::from_str::<Value>(args_text) {
            Ok(Value::Object(m)) => m,
            Ok(_) => {
                return Err(ChannelError::MalformedPayload {
                    channel: "chat",
                    reason: "arguments must be a JSON object".into(),
                })
            }
            Err(e) => {
                return Err(ChannelError::MalformedPayload {
                    channel: "chat",
                    reason: e.to_string(),
                })
            }
        }
    };

    Ok((tool_name.to_string(), arguments))
}

fn render_chat(result: &ToolResult) -> String {
    if result.success {
        let payload = result
            .result
            .as_ref()
            .map(|v| serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()))
            .unwrap_or_else(|| "null".to_string());
        format!("```json\n{payload}\n```")
    } else {
        let mut reply = format!(
            ":warning: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        if let Some(partial) = &result.partial_output {
            let rendered = serde_json::to_string_pretty(partial)
                .unwrap_or_else(|_| partial.to_string());
            reply.push_str(&format!("\nPartial output:\n```json\n{rendered}\n```"));
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tool_and_args() {
        let (tool, args) =
            parse_command(" client_schedule {\"client_name\": \"Mrs. Woo\"}").unwrap();
        assert_eq!(tool, "client_schedule");
        assert_eq!(args["client_name"], "Mrs. Woo");
    }

    #[test]
    fn parses_bare_tool_without_args() {
        let (tool, args) = parse_command(" shift_coverage_report").unwrap();
        assert_eq!(tool, "shift_coverage_report");
        assert!(args.is_empty());
    }

    #[test]
    fn rejects_non_object_args() {
        assert!(parse_command(" t [1,2]").is_err());
        assert!(parse_command(" t not-json").is_err());
        assert!(parse_command("   ").is_err());
    }

    #[test]
    fn success_renders_fenced_json() {
        let reply = render_chat(&ToolResult::ok(json!({"count": 1})));
        assert!(reply.starts_with("```json"));
        assert!(reply.contains("\"count\": 1"));
    }

    #[test]
    fn failure_renders_warning_and_partial() {
        let reply = render_chat(&ToolResult::fail_with_partial(
            "Execution failed: exit 3",
            json!({"output": "half"}),
        ));
        assert!(reply.contains(":warning:"));
        assert!(reply.contains("Partial output"));
        assert!(reply.contains("half"));
    }
}
