//! Configuration types for pyscan.

use crate::lexer::DEFAULT_TAB_WIDTH;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for pyscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to start from (e.g., "recommended", "strict").
    #[serde(default)]
    pub preset: Option<String>,

    /// Lexer configuration.
    #[serde(default)]
    pub lexer: LexerConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the configuration for a rule, if any.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Sets an integer option for a rule, creating its table if needed.
    pub fn set_rule_option(&mut self, rule_name: &str, key: &str, value: i64) {
        self.rules
            .entry(rule_name.to_string())
            .or_default()
            .options
            .insert(key.to_string(), toml::Value::Integer(value));
    }
}

/// Lexer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexerConfig {
    /// Column width a tab expands to (default: 8).
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
        }
    }
}

fn default_tab_width() -> usize {
    DEFAULT_TAB_WIDTH
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a non-negative integer option with a default value.
    ///
    /// Negative values fall back to the default.
    #[must_use]
    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.lexer.tab_width, 8);
        assert!(config.rules.is_empty());
        assert!(config.is_rule_enabled("deep-nesting"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"

[lexer]
tab_width = 4

[rules.too-many-parameters]
enabled = true
max_parameters = 7

[rules.deep-nesting]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.lexer.tab_width, 4);
        assert!(config.is_rule_enabled("too-many-parameters"));
        assert!(!config.is_rule_enabled("deep-nesting"));

        let rule_config = config.rule("too-many-parameters").unwrap();
        assert_eq!(rule_config.get_usize("max_parameters", 5), 7);
        assert_eq!(rule_config.get_option::<i64>("max_parameters"), Some(7));
    }

    #[test]
    fn negative_option_falls_back_to_default() {
        let config = Config::parse("[rules.deep-nesting]\nmax_depth = -1\n").unwrap();
        let rule_config = config.rule("deep-nesting").unwrap();
        assert_eq!(rule_config.get_usize("max_depth", 3), 3);
    }

    #[test]
    fn set_rule_option_creates_table() {
        let mut config = Config::new();
        config.set_rule_option("deep-nesting", "max_depth", 2);
        assert_eq!(
            config.rule("deep-nesting").map(|c| c.get_usize("max_depth", 3)),
            Some(2)
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("preset = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(std::path::Path::new("/nonexistent/pyscan.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
