//! Rule to limit how deeply conditionals nest.
//!
//! # Rationale
//!
//! Every nested `if` adds a condition the reader must keep in mind. Past a
//! few levels, early returns or extracted helpers are easier to follow.
//!
//! # Detected Patterns
//!
//! - an `if` whose depth, counting itself and every block opened since the
//!   innermost function body (`if`, `for`, `while`, `with`, `try`, ...),
//!   exceeds the limit
//!
//! # Configuration
//!
//! - `max_depth`: Maximum depth (default: 3)
//! - `conditionals_only`: Count only `if`/`elif`/`else` blocks (default: false)

use pyscan_core::{Issue, Rule, RuleConfig, TokenCursor, TokenType};
use tracing::trace;

/// Rule code for deep-nesting.
pub const CODE: &str = "PY002";

/// Rule name for deep-nesting.
pub const NAME: &str = "deep-nesting";

/// Default maximum conditional depth.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Limits conditional nesting depth.
#[derive(Debug, Clone)]
pub struct DeepNesting {
    max_depth: usize,
    conditionals_only: bool,
}

impl Default for DeepNesting {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepNesting {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            conditionals_only: false,
        }
    }

    /// Creates a rule from its configuration table.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new().configure(config)
    }

    /// Applies the options present in `config`, keeping current values for
    /// the rest.
    #[must_use]
    pub fn configure(self, config: &RuleConfig) -> Self {
        let conditionals_only = config
            .get_option("conditionals_only")
            .unwrap_or(self.conditionals_only);
        let max_depth = config.get_usize("max_depth", self.max_depth);
        self.max_depth(max_depth)
            .conditionals_only(conditionals_only)
    }

    /// Only count `if`/`elif`/`else` blocks toward the depth.
    #[must_use]
    pub fn conditionals_only(mut self, enabled: bool) -> Self {
        self.conditionals_only = enabled;
        self
    }

    /// Sets the maximum conditional depth.
    #[must_use]
    pub fn max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    /// Returns the configured maximum.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.max_depth
    }
}

impl Rule for DeepNesting {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits how deeply conditionals nest"
    }

    fn trigger(&self) -> TokenType {
        TokenType::If
    }

    fn check(&self, cursor: &mut TokenCursor<'_>) -> Vec<Issue> {
        let enclosing = if self.conditionals_only {
            cursor.conditional_depth()
        } else {
            cursor.nesting_depth()
        };
        let depth = enclosing + 1;
        trace!(line = cursor.current().line, depth, "conditional depth");

        if depth > self.max_depth {
            return vec![Issue::at(
                NAME,
                cursor.current(),
                format!("Deep nesting detected (depth > {})", self.max_depth),
            )];
        }

        Vec::new()
    }
}
