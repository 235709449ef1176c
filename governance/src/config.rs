//! Governor configuration with TOML file support.

use crate::counting::CountingStrategy;
use crate::error::GovernanceError;
use ballot_crypto::Domain;
use ballot_types::Address;
use ballot_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Quorum numerators are expressed out of this denominator (percent).
pub const QUORUM_DENOMINATOR: u128 = 100;

/// Configuration for a governor deployment.
///
/// Can be loaded from a TOML file via [`GovernorConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// EIP-712 domain name.
    #[serde(default = "default_name")]
    pub name: String,

    /// EIP-712 domain version.
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default)]
    pub verifying_contract: Address,

    /// Timepoints between proposal creation and the voting snapshot.
    #[serde(default = "default_voting_delay")]
    pub voting_delay: u64,

    /// Timepoints between the snapshot and the deadline.
    #[serde(default = "default_voting_period")]
    pub voting_period: u64,

    /// Percentage of total supply at the snapshot that must vote for or abstain.
    #[serde(default = "default_quorum_numerator")]
    pub quorum_numerator: u64,

    /// Minimum weight a proposer needs at the previous timepoint.
    #[serde(default)]
    pub proposal_threshold: u64,

    #[serde(default)]
    pub counting: CountingStrategy,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_name() -> String {
    "Governor".to_string()
}

fn default_version() -> String {
    "1".to_string()
}

fn default_chain_id() -> u64 {
    1
}

fn default_voting_delay() -> u64 {
    1
}

fn default_voting_period() -> u64 {
    50_400
}

fn default_quorum_numerator() -> u64 {
    4
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let config: Self = toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.voting_period == 0 {
            return Err(GovernanceError::Config(
                "voting_period must be greater than zero".to_string(),
            ));
        }
        if u128::from(self.quorum_numerator) > QUORUM_DENOMINATOR {
            return Err(GovernanceError::Config(format!(
                "quorum_numerator {} exceeds denominator {}",
                self.quorum_numerator, QUORUM_DENOMINATOR
            )));
        }
        self.log_format()?;
        Ok(())
    }

    /// The signing domain for typed ballots.
    pub fn domain(&self) -> Domain {
        Domain::new(
            self.name.clone(),
            self.version.clone(),
            self.chain_id,
            self.verifying_contract,
        )
    }

    pub fn log_format(&self) -> Result<LogFormat, GovernanceError> {
        self.log_format
            .parse()
            .map_err(|e: ballot_utils::LogFormatError| GovernanceError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    ///
    /// Returns `Ok(false)` if a subscriber was already installed.
    pub fn init_logging(&self) -> Result<bool, GovernanceError> {
        Ok(ballot_utils::init_logging(self.log_format()?, &self.log_level))
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            chain_id: default_chain_id(),
            verifying_contract: Address::ZERO,
            voting_delay: default_voting_delay(),
            voting_period: default_voting_period(),
            quorum_numerator: default_quorum_numerator(),
            proposal_threshold: 0,
            counting: CountingStrategy::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = GovernorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GovernorConfig::default());
        assert_eq!(config.voting_period, 50_400);
        assert_eq!(config.counting, CountingStrategy::Simple);
    }

    #[test]
    fn parses_all_fields() {
        let toml = r#"
            name = "OZ-Governor"
            version = "1"
            chain_id = 31337
            verifying_contract = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
            voting_delay = 4
            voting_period = 16
            quorum_numerator = 10
            proposal_threshold = 5
            counting = "with_params"
            log_format = "json"
            log_level = "debug"
        "#;
        let config = GovernorConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.name, "OZ-Governor");
        assert_eq!(config.chain_id, 31337);
        assert_eq!(
            config.verifying_contract.to_string(),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
        assert_eq!(config.voting_delay, 4);
        assert_eq!(config.voting_period, 16);
        assert_eq!(config.counting, CountingStrategy::WithParams);
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
    }

    #[test]
    fn zero_voting_period_rejected() {
        assert!(matches!(
            GovernorConfig::from_toml_str("voting_period = 0"),
            Err(GovernanceError::Config(_))
        ));
    }

    #[test]
    fn quorum_above_hundred_rejected() {
        assert!(matches!(
            GovernorConfig::from_toml_str("quorum_numerator = 101"),
            Err(GovernanceError::Config(_))
        ));
    }

    #[test]
    fn unknown_counting_rejected() {
        assert!(matches!(
            GovernorConfig::from_toml_str("counting = \"quadratic\""),
            Err(GovernanceError::Config(_))
        ));
    }

    #[test]
    fn unknown_log_format_rejected() {
        assert!(matches!(
            GovernorConfig::from_toml_str("log_format = \"xml\""),
            Err(GovernanceError::Config(_))
        ));
    }

    #[test]
    fn toml_roundtrip_through_file() {
        let mut config = GovernorConfig::default();
        config.voting_delay = 7;
        config.counting = CountingStrategy::WithParams;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();
        let loaded = GovernorConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_config_error() {
        assert!(matches!(
            GovernorConfig::from_toml_file("/nonexistent/governor.toml"),
            Err(GovernanceError::Config(_))
        ));
    }

    #[test]
    fn domain_mirrors_config() {
        let config = GovernorConfig {
            chain_id: 5,
            ..GovernorConfig::default()
        };
        let domain = config.domain();
        assert_eq!(domain.name, "Governor");
        assert_eq!(domain.chain_id, 5);
    }
}
