use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Surface a tool invocation arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Voice,
    Sms,
    Chat,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Voice, Channel::Sms, Channel::Chat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Voice => "voice",
            Channel::Sms => "sms",
            Channel::Chat => "chat",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller identity and conversation coordinates for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallContext {
    pub caller_id: String,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
    pub invocation_id: String,
}

impl CallContext {
    pub fn new(caller_id: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            caller_id: caller_id.into(),
            conversation_id: conversation_id.into(),
            timestamp: Utc::now(),
            invocation_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// One request to run a tool. Built by a channel adapter, consumed once by
/// the dispatcher, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub arguments: serde_json::Map<String, serde_json::Value>,
    pub channel: Channel,
    pub context: CallContext,
}

/// Uniform outcome envelope every dispatch returns, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub partial_output: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            partial_output: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            partial_output: None,
        }
    }

    pub fn fail_with_partial(error: impl Into<String>, partial: serde_json::Value) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            partial_output: Some(partial),
        }
    }
}
