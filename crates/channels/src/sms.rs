//! SMS adapter: engine-issued tool calls for an SMS thread.
//!
//! Within one conversation, tool calls are serialized: one ToolResult
//! completes before the next dispatch starts. The dispatcher itself does
//! not order invocations; that obligation sits here.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::info;

use gigi_core::{CallContext, Channel, SmsSender, ToolInvocation, ToolResult};
use gigi_dispatch::Dispatcher;

use crate::ChannelError;

/// Provider hard-caps concatenated messages; clamp well below it.
const SMS_MAX_LEN: usize = 1200;

pub struct SmsAdapter {
    dispatcher: Arc<Dispatcher>,
    sender: Arc<dyn SmsSender>,
    // Conversation id -> its dispatch lock. Outer map lock is held only
    // long enough to clone the inner lock.
    conversations: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SmsAdapter {
    pub fn new(dispatcher: Arc<Dispatcher>, sender: Arc<dyn SmsSender>) -> Self {
        Self {
            dispatcher,
            sender,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatches one tool call for an SMS thread and texts the rendered
    /// outcome back. Returns the reply body that was sent.
    pub async fn handle_tool_call(
        &self,
        conversation_id: &str,
        from_number: &str,
        tool_name: &str,
        arguments: Map<String, Value>,
    ) -> Result<String, ChannelError> {
        let lock = self.conversation_lock(conversation_id);
        let _serialized = lock.lock().await;

        info!(conversation = conversation_id, tool = tool_name, "sms tool call");

        let invocation = ToolInvocation {
            tool_name: tool_name.to_string(),
            arguments,
            channel: Channel::Sms,
            context: CallContext::new(from_number, conversation_id),
        };
        let result = self.dispatcher.execute(invocation).await;
        let body = render_sms(&result);

        self.sender
            .send(from_number, &body)
            .await
            .map_err(|e| ChannelError::Outbound(e.to_string()))?;

        Ok(body)
    }

    fn conversation_lock(&self, conversation_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.conversations.lock();
        map.entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

fn render_sms(result: &ToolResult) -> String {
    let body = if result.success {
        match &result.result {
            Some(value) => render_success(value),
            None => "Done.".to_string(),
        }
    } else {
        format!(
            "Sorry, that didn't go through: {}",
            result.error.as_deref().unwrap_or("unknown error")
        )
    };
    clamp(body)
}

fn render_success(value: &Value) -> String {
    if value.get("callout_id").is_some() {
        return "Got it - the call-out is logged and staffing has been notified.".to_string();
    }
    if value.get("lead_id").is_some() {
        return "Thanks! Your info is with our care team and someone will reach out shortly."
            .to_string();
    }
    if let Some(shifts) = value.get("shifts").and_then(Value::as_array) {
        if shifts.is_empty() {
            return "No shifts found for that.".to_string();
        }
        let lines: Vec<String> = shifts
            .iter()
            .map(|s| {
                format!(
                    "{} {}-{} ({})",
                    s.get("date").and_then(Value::as_str).unwrap_or("?"),
                    s.get("start_time").and_then(Value::as_str).unwrap_or("?"),
                    s.get("end_time").and_then(Value::as_str).unwrap_or("?"),
                    s.get("status").and_then(Value::as_str).unwrap_or("?"),
                )
            })
            .collect();
        return lines.join("\n");
    }
    "Done.".to_string()
}

fn clamp(mut body: String) -> String {
    if body.len() > SMS_MAX_LEN {
        let mut cut = SMS_MAX_LEN;
        while cut > 0 && !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
