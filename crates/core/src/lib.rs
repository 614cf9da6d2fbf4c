//! Shared types for the Gigi tool-dispatch layer.
//!
//! Everything channel adapters, the dispatcher, and tool handlers exchange
//! lives here: the channel enum, the per-request invocation and context
//! types, the uniform result envelope, and the collaborator traits for the
//! CRM and the telephony provider.

pub mod collaborators;
pub mod error;
pub mod types;

pub use collaborators::{
    CalloutRecord, CrmError, CrmStore, LeadRecord, ShiftRecord, SmsError, SmsSender,
};
pub use error::ToolError;
pub use types::{CallContext, Channel, ToolInvocation, ToolResult};
