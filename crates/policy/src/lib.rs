//! Policy layer: per-channel visibility overrides and the read-only
//! allow-list guard for the workspace admin CLI.

pub mod guard;
pub mod visibility;

use serde::Deserialize;
use thiserror::Error;

pub use guard::{CommandGuard, GuardError};
pub use visibility::{is_visible, schemas_for_channel, ChannelOverrides};

#[derive(Error, Debug)]
pub enum PolicyConfigError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse policy file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Operator-editable policy overrides, loaded from YAML at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    #[serde(default)]
    pub voice_excluded: Vec<String>,
    #[serde(default)]
    pub sms_excluded: Vec<String>,
    #[serde(default)]
    pub chat_excluded: Vec<String>,
    #[serde(default)]
    pub extra_allowed_verbs: Vec<String>,
    #[serde(default)]
    pub extra_blocked_verbs: Vec<String>,
}

impl PolicyFile {
    pub fn load(path: &std::path::Path) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_file_parses_partial_yaml() {
        let policy: PolicyFile =
            serde_yaml::from_str("voice_excluded:\n  - shift_coverage_report\n").unwrap();
        assert_eq!(policy.voice_excluded, vec!["shift_coverage_report"]);
        assert!(policy.extra_blocked_verbs.is_empty());
    }

    #[test]
    fn policy_file_rejects_unknown_keys() {
        let result: Result<PolicyFile, _> = serde_yaml::from_str("voice_exclusions: []\n");
        assert!(result.is_err());
    }
}
