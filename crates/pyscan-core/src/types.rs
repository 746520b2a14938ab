//! Core types for findings, recoveries, and analysis results.

use crate::token::Token;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};

/// A structural finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Name of the rule that produced this issue (e.g., "too-many-parameters").
    pub rule: String,
    /// Human-readable message.
    pub message: String,
    /// Location string, always `line <N>`.
    pub location: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Length of the reported token in bytes.
    #[serde(default)]
    pub length: usize,
}

impl Issue {
    /// Creates a new issue located at `token`.
    #[must_use]
    pub fn at(rule: impl Into<String>, token: &Token<'_>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            location: format!("line {}", token.line),
            line: token.line,
            column: token.column,
            length: token.text.len(),
        }
    }

    /// Creates a new issue from explicit line and column values.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            location: format!("line {line}"),
            line,
            column,
            length: 0,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// What kind of malformed construct was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum RecoveryKind {
    /// A dedent landed on a width that no open block uses.
    InconsistentDedent {
        /// Measured indentation width of the line.
        width: usize,
        /// Width of the enclosing block the stack was resynchronized to.
        resumed_at: usize,
    },
    /// `def` was not followed by an identifier.
    MissingFunctionName,
    /// A function header reached the end of its line without a colon.
    UnterminatedHeader,
    /// A bracket was never closed; line joining stopped here.
    UnclosedBracket {
        /// Line of the outermost unclosed bracket.
        opened_at: usize,
    },
}

/// A locally recovered malformed construct.
///
/// Recoveries never become issues, but they are kept so that skipped
/// input stays observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recovery {
    /// What was recovered from.
    #[serde(flatten)]
    pub kind: RecoveryKind,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Recovery {
    /// Creates a new recovery record.
    #[must_use]
    pub fn new(kind: RecoveryKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

impl std::fmt::Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match self.kind {
            RecoveryKind::InconsistentDedent { width, resumed_at } => write!(
                f,
                "dedent to width {width} matches no open block, resumed at width {resumed_at}"
            ),
            RecoveryKind::MissingFunctionName => f.write_str("`def` without a function name"),
            RecoveryKind::UnterminatedHeader => {
                f.write_str("function header ends without a colon")
            }
            RecoveryKind::UnclosedBracket { opened_at } => {
                write!(f, "bracket opened on line {opened_at} is never closed")
            }
        }
    }
}

/// Result of analyzing one source buffer.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Issues in discovery (source) order.
    pub issues: Vec<Issue>,
    /// Malformed constructs that were skipped.
    pub recoveries: Vec<Recovery>,
    /// Number of tokens pulled from the lexer, `EndOfInput` included.
    pub tokens_scanned: usize,
}

impl AnalysisReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any issue was found.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Returns issues produced by the named rule.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.rule == rule).collect()
    }

    /// Formats the report as a count summary followed by one
    /// `<location>: <message>` line per issue.
    #[must_use]
    pub fn format_text(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("Analysis complete. Found {} issues\n", self.issues.len());
        for issue in &self.issues {
            let _ = writeln!(output, "{issue}");
        }
        output
    }

    /// Consumes the report and returns its issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

/// Renders an [`Issue`] as a miette diagnostic with a source snippet.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct IssueDiagnostic {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl IssueDiagnostic {
    /// Creates a diagnostic for `issue` within `content`, named `name`.
    #[must_use]
    pub fn new(issue: &Issue, name: &str, content: &str) -> Self {
        let offset = offset_for(content, issue.line, issue.column);
        Self {
            message: issue.message.clone(),
            source_code: NamedSource::new(name, content.to_string()),
            span: SourceSpan::from((offset, issue.length)),
            label_message: issue.rule.clone(),
        }
    }
}

/// Calculates the byte offset of a 1-indexed line and character column.
///
/// Out-of-range positions clamp to the end of the line or buffer.
#[must_use]
pub fn offset_for(content: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line_content) in content.split('\n').enumerate() {
        if i + 1 == line {
            let within = line_content
                .char_indices()
                .nth(column.saturating_sub(1))
                .map_or(line_content.len(), |(idx, _)| idx);
            return offset + within;
        }
        offset += line_content.len() + 1;
    }

    content.len()
}
