//! Rule presets for common configurations.

use crate::{deep_nesting, too_many_parameters, DeepNesting, TooManyParameters};
use pyscan_core::{Config, RuleBox};
use tracing::warn;

/// Preset configurations for pyscan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Recommended rules with the default thresholds.
    #[default]
    Recommended,
    /// Tighter thresholds for new code.
    Strict,
}

impl Preset {
    /// Parses a preset name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "recommended" | "default" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
        }
    }

    fn parameters(self) -> TooManyParameters {
        match self {
            Self::Recommended => TooManyParameters::new(),
            Self::Strict => TooManyParameters::new().max_parameters(3),
        }
    }

    fn nesting(self) -> DeepNesting {
        match self {
            Self::Recommended => DeepNesting::new(),
            Self::Strict => DeepNesting::new().max_depth(2),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `too-many-parameters` (PY001) - at most 5 parameters
/// - `deep-nesting` (PY002) - an `if` at most 3 levels deep
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(Preset::Recommended.parameters()),
        Box::new(Preset::Recommended.nesting()),
    ]
}

/// Returns the strict set of rules.
///
/// Includes:
/// - `too-many-parameters` (PY001) - at most 3 parameters
/// - `deep-nesting` (PY002) - an `if` at most 2 levels deep
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(Preset::Strict.parameters()),
        Box::new(Preset::Strict.nesting()),
    ]
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    recommended_rules()
}

/// Builds the rule set described by `config`.
///
/// Starts from the configured preset (recommended when absent or unknown)
/// and applies per-rule options on top. Rules disabled in `config` are still
/// returned; the analyzer builder drops them.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::default(),
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            warn!("Unknown preset: {}, using recommended", name);
            Preset::default()
        }),
    };

    let mut parameters = preset.parameters();
    if let Some(rule_config) = config.rule(too_many_parameters::NAME) {
        let max_parameters = rule_config.get_usize("max_parameters", parameters.limit());
        parameters = parameters.max_parameters(max_parameters);
    }

    let mut nesting = preset.nesting();
    if let Some(rule_config) = config.rule(deep_nesting::NAME) {
        nesting = nesting.configure(rule_config);
    }

    vec![Box::new(parameters), Box::new(nesting)]
}
