//! Config-driven entry points.

use pyscan_core::{AnalysisReport, Analyzer, AnalyzerError, Config};
use pyscan_rules::rules_from_config;
use std::path::Path;

/// Builds an analyzer with the rules and lexer settings described by `config`.
#[must_use]
pub fn build_analyzer(config: &Config) -> Analyzer {
    let analyzer = Analyzer::builder()
        .rules(rules_from_config(config))
        .config(config.clone())
        .build();
    tracing::debug!("Built analyzer with {} rules", analyzer.rule_count());
    analyzer
}

/// Analyzes an in-memory source buffer.
#[must_use]
pub fn analyze_source(source: &str, config: &Config) -> AnalysisReport {
    build_analyzer(config).analyze(source)
}

/// Reads `path` fully into memory and analyzes it.
///
/// # Errors
///
/// Returns [`AnalyzerError::Read`] if the file cannot be read. No partial
/// results are produced in that case.
pub fn analyze_file(path: &Path, config: &Config) -> Result<AnalysisReport, AnalyzerError> {
    build_analyzer(config).analyze_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_both_rules_by_default() {
        assert_eq!(build_analyzer(&Config::default()).rule_count(), 2);
    }

    #[test]
    fn disabled_rule_is_not_built() {
        let config = Config::parse("[rules.deep-nesting]\nenabled = false\n").unwrap();
        let analyzer = build_analyzer(&config);
        assert_eq!(analyzer.rule_count(), 1);
        assert_eq!(
            analyzer.registry().iter().map(|r| r.name()).collect::<Vec<_>>(),
            vec!["too-many-parameters"]
        );
    }

    #[test]
    fn tab_width_flows_from_config() {
        let config = Config::parse("[lexer]\ntab_width = 2\n").unwrap();
        assert_eq!(build_analyzer(&config).tab_width(), 2);
    }

    #[test]
    fn analyze_source_applies_config_thresholds() {
        let config = Config::parse("[rules.too-many-parameters]\nmax_parameters = 1\n").unwrap();
        let report = analyze_source("def f(a, b):\n    pass\n", &config);
        assert_eq!(report.issues.len(), 1);
    }
}
