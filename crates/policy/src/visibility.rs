//! Per-channel visibility: a tool is callable on a channel only if it is
//! in the tool's declared `channels` set and not in that channel's named
//! override-exclusion list. Both checks are pure functions of startup
//! configuration.

use std::collections::HashSet;

use gigi_catalog::{Catalog, ToolDefinition};
use gigi_core::Channel;

/// Output too long/tabular to be spoken on a live call.
const VOICE_EXCLUDED: &[&str] = &["shift_coverage_report"];

/// Needs interactive disambiguation that an SMS thread cannot carry.
const SMS_EXCLUDED: &[&str] = &["caregiver_schedule"];

const CHAT_EXCLUDED: &[&str] = &[];

/// Named per-channel exclusion lists layered on top of the declared
/// `channels` sets.
#[derive(Debug, Clone)]
pub struct ChannelOverrides {
    voice: HashSet<String>,
    sms: HashSet<String>,
    chat: HashSet<String>,
}

impl Default for ChannelOverrides {
    fn default() -> Self {
        Self {
            voice: VOICE_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            sms: SMS_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            chat: CHAT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChannelOverrides {
    /// Default lists plus operator-configured additions.
    pub fn with_extra(voice: &[String], sms: &[String], chat: &[String]) -> Self {
        let mut overrides = Self::default();
        overrides.voice.extend(voice.iter().cloned());
        overrides.sms.extend(sms.iter().cloned());
        overrides.chat.extend(chat.iter().cloned());
        overrides
    }

    pub fn is_excluded(&self, tool_name: &str, channel: Channel) -> bool {
        match channel {
            Channel::Voice => self.voice.contains(tool_name),
            Channel::Sms => self.sms.contains(tool_name),
            Channel::Chat => self.chat.contains(tool_name),
        }
    }
}

/// True iff `channel` is in the tool's declared set and the tool is not
/// suppressed by that channel's override list.
pub fn is_visible(def: &ToolDefinition, channel: Channel, overrides: &ChannelOverrides) -> bool {
    def.channels.contains(&channel) && !overrides.is_excluded(&def.name, channel)
}

/// Schemas for every tool visible on `channel`, in LLM function-call
/// format, in catalog declaration order. Both visibility mechanisms
/// apply: a tool suppressed by an override list is never advertised to
/// the conversation engine.
pub fn schemas_for_channel(
    catalog: &Catalog,
    channel: Channel,
    overrides: &ChannelOverrides,
) -> Vec<serde_json::Value> {
    catalog
        .iter()
        .filter(|def| is_visible(def, channel, overrides))
        .map(|def| {
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": def.name,
                    "description": def.description,
                    "parameters": def.parameter_schema(),
                }
            })
        })
        .collect()
}
