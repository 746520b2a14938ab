//! # pyscan
//!
//! Structural linter for indentation-sensitive source code.
//!
//! This is the main facade crate that re-exports core functionality and
//! rules, and wires a [`Config`] into a ready-to-run [`Analyzer`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pyscan::Config;
//!
//! let report = pyscan::analyze_file("example.py".as_ref(), &Config::default())?;
//! print!("{}", report.format_text());
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use pyscan::Analyzer;
//! use pyscan::rules::TooManyParameters;
//!
//! let analyzer = Analyzer::builder()
//!     .rule(TooManyParameters::new().max_parameters(3))
//!     .build();
//!
//! let report = analyzer.analyze("def f(a, b, c, d):\n    pass\n");
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use pyscan_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use pyscan_rules::*;
}

mod runner;

pub use runner::{analyze_file, analyze_source, build_analyzer};
