//! Check command implementation.

use anyhow::{Context, Result};
use pyscan::rules::{deep_nesting, rules_from_config, too_many_parameters};
use pyscan::{Analyzer, Config, RuleBox};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Threshold overrides given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Replaces `rules.too-many-parameters.max_parameters`.
    pub max_parameters: Option<u32>,
    /// Replaces `rules.deep-nesting.max_depth`.
    pub max_depth: Option<u32>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(max) = self.max_parameters {
            config.set_rule_option(too_many_parameters::NAME, "max_parameters", i64::from(max));
        }
        if let Some(max) = self.max_depth {
            config.set_rule_option(deep_nesting::NAME, "max_depth", i64::from(max));
        }
    }
}

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    overrides: Overrides,
    source: &ConfigSource,
) -> Result<()> {
    let mut config = load_config(source)?;
    overrides.apply(&mut config);

    let mut rules = rules_from_config(&config);
    if let Some(filter) = rules_filter {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        rules = filter_rules(rules, &names);
    }

    let analyzer = Analyzer::builder().rules(rules).config(config).build();

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let report = analyzer
        .analyze_file(path)
        .with_context(|| format!("Analysis failed for {}", path.display()))?;

    super::output::print(&report, format, path)?;

    // Exit with error code if there are issues
    if report.has_issues() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    if matches!(source, ConfigSource::Default) {
        return Ok(Config::default());
    }

    // Invariant: non-Default variants always have a path
    let p = source.path().context("resolved config has no path")?;
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

fn filter_rules(rules: Vec<RuleBox>, names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        if !rules.iter().any(|r| r.name() == *name || r.code() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    rules
        .into_iter()
        .filter(|r| names.contains(&r.name()) || names.contains(&r.code()))
        .collect()
}
