//! Election configuration with TOML file support.
//!
//! The policy switches select between the behaviours deployed validators
//! disagree on: whether time windows gate registration and voting, whether a
//! party number must equal its candidate id, whether candidates carry identity
//! tokens, and whether candidates may be removed during setup.

use ballot_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ElectionError;

/// Whether registration and voting are gated by wall-clock windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Phase alone gates the operation; configured windows are recorded only.
    Unchecked,
    /// The current time must also lie inside the configured window.
    Enforced,
}

/// How party numbers relate to candidate ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyNumberPolicy {
    /// Any unused number in range.
    Independent,
    /// Party number must equal the candidate id.
    MatchCandidateId,
}

/// Configuration for an election engine.
///
/// Can be loaded from a TOML file via [`ElectionConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(default = "default_window_policy")]
    pub window_policy: WindowPolicy,

    #[serde(default = "default_party_numbers")]
    pub party_numbers: PartyNumberPolicy,

    /// Candidates must present an identity token, and voters may not reuse one.
    #[serde(default)]
    pub candidate_identity: bool,

    #[serde(default)]
    pub allow_candidate_removal: bool,

    /// Highest candidate id accepted (ids start at 1).
    #[serde(default = "default_max_candidate_id")]
    pub max_candidate_id: u32,

    /// Highest party number accepted (numbers start at 1).
    #[serde(default = "default_max_party_number")]
    pub max_party_number: u32,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_window_policy() -> WindowPolicy {
    WindowPolicy::Unchecked
}

fn default_party_numbers() -> PartyNumberPolicy {
    PartyNumberPolicy::Independent
}

fn default_max_candidate_id() -> u32 {
    50
}

fn default_max_party_number() -> u32 {
    99
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ElectionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ElectionError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ElectionError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ElectionError> {
        let config: Self = toml::from_str(s).map_err(|e| ElectionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ElectionError> {
        toml::to_string_pretty(self).map_err(|e| ElectionError::Config(e.to_string()))
    }

    /// Reject settings under which no candidate could ever be added.
    pub fn validate(&self) -> Result<(), ElectionError> {
        if self.max_candidate_id == 0 {
            return Err(ElectionError::Config("max_candidate_id must be at least 1".into()));
        }
        if self.max_party_number == 0 {
            return Err(ElectionError::Config("max_party_number must be at least 1".into()));
        }
        if self.party_numbers == PartyNumberPolicy::MatchCandidateId
            && self.max_party_number < self.max_candidate_id
        {
            return Err(ElectionError::Config(format!(
                "match_candidate_id needs max_party_number >= max_candidate_id ({} < {})",
                self.max_party_number, self.max_candidate_id
            )));
        }
        Ok(())
    }

    /// Install the global log subscriber described by this config.
    pub fn init_logging(&self) {
        ballot_utils::init_logging(self.log_format, &self.log_level);
    }
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            window_policy: default_window_policy(),
            party_numbers: default_party_numbers(),
            candidate_identity: false,
            allow_candidate_removal: false,
            max_candidate_id: default_max_candidate_id(),
            max_party_number: default_max_party_number(),
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
    fn default_config_round_trips_through_toml() {
        let config = ElectionConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ElectionConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ElectionConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.window_policy, WindowPolicy::Unchecked);
        assert_eq!(config.party_numbers, PartyNumberPolicy::Independent);
        assert_eq!(config.max_candidate_id, 50);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            window_policy = "enforced"
            party_numbers = "match_candidate_id"
            candidate_identity = true
            max_candidate_id = 10
            log_format = "json"
        "#;
        let config = ElectionConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.window_policy, WindowPolicy::Enforced);
        assert_eq!(config.party_numbers, PartyNumberPolicy::MatchCandidateId);
        assert!(config.candidate_identity);
        assert!(!config.allow_candidate_removal);
        assert_eq!(config.max_candidate_id, 10);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = ElectionConfig::from_toml_str(r#"window_policy = "sometimes""#).unwrap_err();
        assert!(matches!(err, ElectionError::Config(_)));
    }

    #[test]
    fn validate_rejects_unusable_ranges() {
        let err = ElectionConfig::from_toml_str("max_candidate_id = 0").unwrap_err();
        assert!(matches!(err, ElectionError::Config(_)));

        let toml = r#"
            party_numbers = "match_candidate_id"
            max_candidate_id = 20
            max_party_number = 10
        "#;
        assert!(matches!(
            ElectionConfig::from_toml_str(toml),
            Err(ElectionError::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allow_candidate_removal = true").unwrap();
        let config = ElectionConfig::from_toml_file(file.path()).unwrap();
        assert!(config.allow_candidate_removal);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = ElectionConfig::from_toml_file("/nonexistent/election.toml");
        assert!(matches!(result, Err(ElectionError::Config(_))));
    }
}
