//! Channel adapters: the three surfaces tool invocations arrive through.
//!
//! Each adapter turns a channel-native event into a [`ToolInvocation`],
//! hands it to the dispatcher, and renders the resulting envelope back
//! into channel-native form. Adapters own all user-facing wording; the
//! dispatcher never does.

pub mod chat;
pub mod sms;
pub mod telephony;
pub mod voice;

pub use chat::ChatAdapter;
pub use sms::SmsAdapter;
pub use telephony::TelephonyClient;
pub use voice::VoiceAdapter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("malformed {channel} payload: {reason}")]
    MalformedPayload { channel: &'static str, reason: String },

    #[error("outbound send failed: {0}")]
    Outbound(String),
}
