//! # pyscan-core
//!
//! Core framework for structural linting of indentation-sensitive source
//! code without building a parse tree.
//!
//! This crate provides:
//!
//! - [`Lexer`] a pull-based lexer emitting `Indent`/`Dedent` markers
//! - [`TokenCursor`] the single-token lookahead rules read from
//! - [`Rule`] trait and [`RuleRegistry`] for trigger-keyed dispatch
//! - [`Analyzer`] for driving rules over a source buffer
//! - [`Issue`] and [`AnalysisReport`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use pyscan_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .rule(MyRule::new())
//!     .build();
//!
//! let report = analyzer.analyze("def f(a, b):\n    pass\n");
//! print!("{}", report.format_text());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod cursor;
mod lexer;
mod rule;
mod token;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{Config, ConfigError, LexerConfig, RuleConfig};
pub use cursor::{BlockKind, TokenCursor};
pub use lexer::{Lexer, DEFAULT_TAB_WIDTH};
pub use rule::{Rule, RuleBox, RuleRegistry};
pub use token::{Token, TokenType};
pub use types::{offset_for, AnalysisReport, Issue, IssueDiagnostic, Recovery, RecoveryKind};
