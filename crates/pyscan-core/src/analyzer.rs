//! Core analyzer driving rules over the token stream.

use crate::config::Config;
use crate::cursor::TokenCursor;
use crate::lexer::{Lexer, DEFAULT_TAB_WIDTH};
use crate::rule::{Rule, RuleBox, RuleRegistry};
use crate::types::{AnalysisReport, Issue};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The source file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    tab_width: Option<usize>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules to the analyzer.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the tab width, overriding the configuration.
    #[must_use]
    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = Some(width);
        self
    }

    /// Builds the analyzer.
    ///
    /// Rules disabled in the configuration are dropped here.
    #[must_use]
    pub fn build(self) -> Analyzer {
        let config = self.config.unwrap_or_default();
        let tab_width = self.tab_width.unwrap_or(config.lexer.tab_width);

        let mut registry = RuleRegistry::new();
        for rule in self.rules {
            if !config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            registry.register(rule);
        }

        Analyzer {
            registry,
            tab_width,
        }
    }
}

/// The analyzer that drives rules over a token stream.
///
/// An `Analyzer` holds only configuration, so one instance can analyze any
/// number of sources, from any number of threads. Each call builds its own
/// lexer and cursor.
///
/// Use [`Analyzer::builder()`] to construct an instance.
#[derive(Debug)]
pub struct Analyzer {
    registry: RuleRegistry,
    tab_width: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            registry: RuleRegistry::new(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the registered rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Returns the tab width used for indentation measurement.
    #[must_use]
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Analyzes a source buffer.
    ///
    /// This never fails: malformed constructs are skipped and recorded in
    /// [`AnalysisReport::recoveries`].
    #[must_use]
    pub fn analyze(&self, source: &str) -> AnalysisReport {
        debug!(
            "Analyzing {} bytes with {} rules",
            source.len(),
            self.registry.len()
        );
        let lexer = Lexer::with_tab_width(source, self.tab_width);
        Scan::new(&self.registry, lexer).run()
    }

    /// Reads a file fully into memory and analyzes it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Read`] if the file cannot be read; no
    /// analysis is attempted in that case.
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisReport, AnalyzerError> {
        info!("Starting analysis of {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let report = self.analyze(&content);

        info!(
            "Analysis complete: {} issues, {} recoveries in {}",
            report.issues.len(),
            report.recoveries.len(),
            path.display()
        );

        Ok(report)
    }
}

/// State of one analysis run. Consumed by [`Scan::run`].
struct Scan<'a, 'src> {
    registry: &'a RuleRegistry,
    cursor: TokenCursor<'src>,
    issues: Vec<Issue>,
}

impl<'a, 'src> Scan<'a, 'src> {
    fn new(registry: &'a RuleRegistry, lexer: Lexer<'src>) -> Self {
        Self {
            registry,
            cursor: TokenCursor::new(lexer),
            issues: Vec::new(),
        }
    }

    fn run(mut self) -> AnalysisReport {
        let registry = self.registry;

        while !self.cursor.at_end() {
            let trigger = *self.cursor.current();
            let start = self.cursor.position();

            for rule in registry.rules_for(trigger.kind) {
                trace!(rule = rule.name(), line = trigger.line, "dispatch");
                let found = rule.check(&mut self.cursor);
                self.issues.extend(found);

                // The remaining rules for this trigger no longer see it.
                if self.cursor.position() != start {
                    break;
                }
            }

            let held = self.cursor.take_hold();
            if !(held && self.cursor.position() != start) {
                self.cursor.advance();
            }
        }

        AnalysisReport {
            issues: self.issues,
            tokens_scanned: self.cursor.position(),
            recoveries: self.cursor.into_recoveries(),
        }
    }
}
