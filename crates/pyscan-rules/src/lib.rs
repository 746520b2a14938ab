//! # pyscan-rules
//!
//! Built-in structural rules for pyscan.
//!
//! ## Available Rules
//!
//! | Code | Name | Trigger | Description |
//! |------|------|---------|-------------|
//! | PY001 | `too-many-parameters` | `def` | Limits the number of parameters a function takes |
//! | PY002 | `deep-nesting` | `if` | Limits how deeply conditionals nest |
//!
//! ## Usage
//!
//! ```ignore
//! use pyscan_core::Analyzer;
//! use pyscan_rules::{DeepNesting, TooManyParameters};
//!
//! let analyzer = Analyzer::builder()
//!     .rule(TooManyParameters::new().max_parameters(4))
//!     .rule(DeepNesting::new())
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod deep_nesting;
mod presets;
pub mod too_many_parameters;

pub use deep_nesting::DeepNesting;
pub use presets::{all_rules, recommended_rules, rules_from_config, strict_rules, Preset};
pub use too_many_parameters::TooManyParameters;

/// Re-export core types for convenience.
pub use pyscan_core::{Issue, Rule};
