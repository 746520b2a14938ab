//! Rule trait and the registry that dispatches rules by trigger token.

use crate::cursor::TokenCursor;
use crate::token::TokenType;
use crate::types::Issue;
use std::collections::HashMap;

/// A structural rule driven by the token stream.
///
/// A rule is dispatched whenever the analyzer's lookahead token has the
/// rule's [`trigger`](Rule::trigger) type. It may advance the cursor to
/// inspect what follows; on return the cursor should rest on the last token
/// the rule looked at, which the analyzer then steps over.
///
/// # Example
///
/// ```ignore
/// use pyscan_core::{Issue, Rule, TokenCursor, TokenType};
///
/// pub struct NoBareColon;
///
/// impl Rule for NoBareColon {
///     fn name(&self) -> &'static str { "no-bare-colon" }
///     fn code(&self) -> &'static str { "PY900" }
///     fn trigger(&self) -> TokenType { TokenType::Colon }
///
///     fn check(&self, cursor: &mut TokenCursor<'_>) -> Vec<Issue> {
///         vec![Issue::at(self.name(), cursor.current(), "colon found")]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "deep-nesting").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "PY002").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the token type this rule is dispatched on.
    fn trigger(&self) -> TokenType;

    /// Checks the construct starting at the cursor's lookahead.
    ///
    /// # Returns
    ///
    /// The issues found, in source order.
    fn check(&self, cursor: &mut TokenCursor<'_>) -> Vec<Issue>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Rules grouped by trigger token type.
///
/// Rules sharing a trigger keep their registration order, and
/// [`iter`](Self::iter) yields every rule in registration order.
#[derive(Default)]
pub struct RuleRegistry {
    by_trigger: HashMap<TokenType, Vec<RuleBox>>,
    /// Trigger and bucket index of each rule, in registration order.
    order: Vec<(TokenType, usize)>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule under its trigger.
    pub fn register(&mut self, rule: RuleBox) {
        let trigger = rule.trigger();
        let bucket = self.by_trigger.entry(trigger).or_default();
        self.order.push((trigger, bucket.len()));
        bucket.push(rule);
    }

    /// Returns the rules dispatched on `kind`.
    #[must_use]
    pub fn rules_for(&self, kind: TokenType) -> &[RuleBox] {
        self.by_trigger
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over every registered rule in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleBox> {
        self.order.iter().filter_map(|(trigger, index)| {
            self.by_trigger
                .get(trigger)
                .and_then(|bucket| bucket.get(*index))
        })
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().map(|r| r.name()).collect();
        f.debug_struct("RuleRegistry").field("rules", &names).finish()
    }
}

impl FromIterator<RuleBox> for RuleRegistry {
    fn from_iter<I: IntoIterator<Item = RuleBox>>(iter: I) -> Self {
        let mut registry = Self::new();
        for rule in iter {
            registry.register(rule);
        }
        registry
    }
}
