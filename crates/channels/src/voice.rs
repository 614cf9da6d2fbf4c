//! Voice adapter: tool-call webhooks from the conversational-voice vendor.
//!
//! The vendor's flow engine decides when to call a tool mid-call and posts
//! a tool-call event; we dispatch it and hand back a short sentence the
//! agent speaks. The vendor serializes turns within a call, so no extra
//! per-conversation locking is needed here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::ChannelError;
use gigi_core::{CallContext, Channel, ToolInvocation, ToolResult};
use gigi_dispatch::Dispatcher;

#[derive(Debug, Deserialize)]
struct VoicePayload {
    call: CallInfo,
    tool_call: ToolCallBody,
}

#[derive(Debug, Deserialize)]
struct CallInfo {
    call_id: String,
    from_number: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallBody {
    name: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

/// What the agent says next, in the shape the vendor webhook expects back.
#[derive(Debug, Serialize)]
pub struct VoiceReply {
    pub response: String,
}

pub struct VoiceAdapter {
    dispatcher: Arc<Dispatcher>,
}

impl VoiceAdapter {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn handle_tool_call(&self, payload: &Value) -> Result<VoiceReply, ChannelError> {
        let event: VoicePayload =
            serde_json::from_value(payload.clone()).map_err(|e| ChannelError::MalformedPayload {
                channel: "voice",
                reason: e.to_string(),
            })?;

        info!(call = %event.call.call_id, tool = %event.tool_call.name, "voice tool call");

        let invocation = ToolInvocation {
            tool_name: event.tool_call.name,
            arguments: event.tool_call.arguments,
            channel: Channel::Voice,
            context: CallContext::new(event.call.from_number, event.call.call_id),
        };
        let result = self.dispatcher.execute(invocation).await;

        Ok(VoiceReply {
            response: render_spoken(&result),
        })
    }
}

/// A short sentence the agent can speak. Raw payloads and error details
/// are never read aloud.
fn render_spoken(result: &ToolResult) -> String {
    if !result.success {
        return "I'm sorry, I wasn't able to finish that just now. \
                I'll flag it for the office team to follow up."
            .to_string();
    }
    let Some(value) = &result.result else {
        return "All set, that's been taken care of.".to_string();
    };
    if value.get("callout_id").is_some() {
        return "Okay, I've logged that call-out and the staffing team has been notified."
            .to_string();
    }
    if value.get("lead_id").is_some() {
        return "Thanks, I've passed your information along to our care team.".to_string();
    }
    if let Some(count) = value.get("count").and_then(Value::as_u64) {
        return match count {
            0 => "I don't see any shifts on the schedule for that.".to_string(),
            1 => "I found one shift on the schedule.".to_string(),
            n => format!("I found {n} shifts on the schedule."),
        };
    }
    "All set, that's been taken care of.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_payload_is_channel_error() {
        // Exercised without a dispatcher: parsing happens first.
        let bad: Result<VoicePayload, _> = serde_json::from_value(json!({"call": {}}));
        assert!(bad.is_err());
    }

    #[test]
    fn failure_renders_apology_without_detail() {
        let spoken = render_spoken(&ToolResult::fail("CRM timeout: secret-host:5432"));
        assert!(spoken.contains("sorry"));
        assert!(!spoken.contains("secret-host"));
    }

    #[test]
    fn callout_success_renders_confirmation() {
        let spoken = render_spoken(&ToolResult::ok(json!({"callout_id": "co-1"})));
        assert!(spoken.contains("logged"));
    }

    #[test]
    fn schedule_counts_render_naturally() {
        assert!(render_spoken(&ToolResult::ok(json!({"count": 0, "shifts": []})))
            .contains("don't see any"));
        assert!(render_spoken(&ToolResult::ok(json!({"count": 1, "shifts": [{}]})))
            .contains("one shift"));
        assert!(render_spoken(&ToolResult::ok(json!({"count": 3, "shifts": [{}, {}, {}]})))
            .contains("3 shifts"));
    }

    #[test]
    fn unknown_success_payload_gets_generic_line() {
        let spoken = render_spoken(&ToolResult::ok(json!({"output": "row1\nrow2"})));
        assert_eq!(spoken, "All set, that's been taken care of.");
    }
}
