//! Rule to limit the number of parameters a function takes.
//!
//! # Rationale
//!
//! Long parameter lists are hard to call correctly and usually mean a
//! function is doing several jobs. Grouping related values into an object
//! or splitting the function keeps call sites readable.
//!
//! # Detected Patterns
//!
//! - `def name(...):` headers with more identifiers between the name and the
//!   colon than the limit allows
//!
//! The count is an approximation taken from the token stream: annotation
//! and default-value identifiers count too.
//!
//! # Configuration
//!
//! - `max_parameters`: Maximum identifiers in a header (default: 5)

use pyscan_core::{Issue, RecoveryKind, Rule, RuleConfig, TokenCursor, TokenType};
use tracing::trace;

/// Rule code for too-many-parameters.
pub const CODE: &str = "PY001";

/// Rule name for too-many-parameters.
pub const NAME: &str = "too-many-parameters";

/// Default maximum number of parameters.
pub const DEFAULT_MAX_PARAMETERS: usize = 5;

/// Limits the number of parameters in a function header.
#[derive(Debug, Clone)]
pub struct TooManyParameters {
    max_parameters: usize,
}

impl Default for TooManyParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl TooManyParameters {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_parameters: DEFAULT_MAX_PARAMETERS,
        }
    }

    /// Creates a rule from its configuration table.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new().max_parameters(config.get_usize("max_parameters", DEFAULT_MAX_PARAMETERS))
    }

    /// Sets the maximum number of parameters.
    #[must_use]
    pub fn max_parameters(mut self, max: usize) -> Self {
        self.max_parameters = max;
        self
    }

    /// Returns the configured maximum.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.max_parameters
    }
}

impl Rule for TooManyParameters {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of parameters a function takes"
    }

    fn trigger(&self) -> TokenType {
        TokenType::Def
    }

    fn check(&self, cursor: &mut TokenCursor<'_>) -> Vec<Issue> {
        cursor.advance();

        if cursor.current().kind != TokenType::Identifier {
            cursor.record_recovery(RecoveryKind::MissingFunctionName);
            cursor.hold();
            return Vec::new();
        }
        let function_name = cursor.current().text;
        cursor.advance();

        let count = count_header_identifiers(cursor);

        let terminator = *cursor.current();
        if terminator.kind == TokenType::Newline {
            cursor.record_recovery(RecoveryKind::UnterminatedHeader);
            cursor.hold();
            return Vec::new();
        }

        trace!(function = function_name, count, "counted parameters");

        if count > self.max_parameters {
            return vec![Issue::at(
                NAME,
                &terminator,
                format!("Function '{function_name}' has too many parameters ({count})"),
            )];
        }

        Vec::new()
    }
}

/// Advances to the header's colon, newline or end of input, counting
/// identifiers on the way.
fn count_header_identifiers(cursor: &mut TokenCursor<'_>) -> usize {
    let mut count = 0;
    loop {
        match cursor.current().kind {
            TokenType::Colon | TokenType::Newline | TokenType::EndOfInput => return count,
            TokenType::Identifier => count += 1,
            _ => {}
        }
        cursor.advance();
    }
}
