use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub admin_cli: AdminCliConfig,
    pub crm: CrmConfig,
    pub telephony: Option<TelephonyConfig>,
    /// Optional YAML file with visibility/verb overrides.
    pub policy_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminCliConfig {
    #[serde(default = "default_admin_program")]
    pub program: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for AdminCliConfig {
    fn default() -> Self {
        Self {
            program: default_admin_program(),
            timeout_ms: default_timeout_ms(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CrmConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct TelephonyConfig {
    pub base_url: String,
    pub from_number: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_admin_program() -> String {
    "gam".to_string()
}

fn default_max_output_bytes() -> usize {
    8_192
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Tokens come from the environment, never from the config file.
    pub fn crm_token() -> Result<String> {
        std::env::var("GIGI_CRM_TOKEN").context("GIGI_CRM_TOKEN is not set")
    }

    pub fn telephony_token() -> Result<String> {
        std::env::var("GIGI_TELEPHONY_TOKEN").context("GIGI_TELEPHONY_TOKEN is not set")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = toml::from_str("[crm]\nbase_url = \"https://crm.example\"\n").unwrap();
        assert_eq!(config.dispatch.timeout_ms, 30_000);
        assert_eq!(config.admin_cli.program, "gam");
        assert_eq!(config.admin_cli.max_output_bytes, 8_192);
        assert!(config.telephony.is_none());
        assert!(config.policy_file.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            policy_file = "policy.yaml"

            [dispatch]
            timeout_ms = 10000

            [admin_cli]
            program = "gam"
            timeout_ms = 20000
            max_output_bytes = 4096

            [crm]
            base_url = "https://crm.example"

            [telephony]
            base_url = "https://sms.example/v2"
            from_number = "+15550000"
            "#,
        )
        .unwrap();
        assert_eq!(config.dispatch.timeout_ms, 10_000);
        assert_eq!(config.telephony.unwrap().from_number, "+15550000");
        assert_eq!(config.policy_file.unwrap().to_str().unwrap(), "policy.yaml");
    }

    #[test]
    fn missing_crm_section_is_an_error() {
        assert!(toml::from_str::<Config>("").is_err());
    }

    #[test]
    fn load_reads_from_disk_and_names_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gigi.toml");
        std::fs::write(&path, "[crm]\nbase_url = \"https://crm.example\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.crm.base_url, "https://crm.example");

        let missing = dir.path().join("absent.toml");
        let err = Config::load(&missing).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
