use serde::{Deserialize, Serialize};
use serde_json::json;

use gigi_core::Channel;

/// Argument value type a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }

    /// Whether a JSON value matches this kind.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
        }
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub description: String,
    /// Closed set of accepted string values, when the parameter is an enum.
    pub allowed: Option<Vec<String>>,
}

impl ParamSpec {
    pub fn required(name: &str, kind: ParamKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            description: description.to_string(),
            allowed: None,
        }
    }

    pub fn optional(name: &str, kind: ParamKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            description: description.to_string(),
            allowed: None,
        }
    }

    pub fn with_allowed(mut self, allowed: &[&str]) -> Self {
        self.allowed = Some(allowed.iter().map(|s| s.to_string()).collect());
        self
    }
}

/// One callable action: name, contract, channel set, and the registry key
/// of its handler. Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// Declaration order is meaningful: validation reports the first
    /// violation in this order.
    pub params: Vec<ParamSpec>,
    pub channels: Vec<Channel>,
    /// Opaque key resolved against the handler registry at startup.
    pub handler: &'static str,
}

impl ToolDefinition {
    pub fn new(
        name: &str,
        description: &str,
        params: Vec<ParamSpec>,
        channels: &[Channel],
        handler: &'static str,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            params,
            channels: channels.to_vec(),
            handler,
        }
    }

    /// JSON-schema object for this tool's parameters.
    pub fn parameter_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for p in &self.params {
            let mut prop = serde_json::Map::new();
            prop.insert("type".into(), json!(p.kind.as_str()));
            prop.insert("description".into(), json!(p.description));
            if let Some(allowed) = &p.allowed {
                prop.insert("enum".into(), json!(allowed));
            }
            properties.insert(p.name.clone(), serde_json::Value::Object(prop));
            if p.required {
                required.push(p.name.clone());
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
