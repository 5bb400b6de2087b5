//! Seams for the two upstream grammars.
//!
//! The conditional-restriction syntax and the opening-hours syntax are parsed
//! by external implementations. The evaluator only ever sees their output,
//! so tests can fabricate ASTs directly.

use crate::domain::Rule;

/// Error reported by a grammar implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("grammar error: {message}")]
pub struct GrammarError {
    pub message: String,
}

impl GrammarError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A clause as produced by the conditional-restriction grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRestriction {
    pub value: String,
    pub conditions: Vec<RawCondition>,
}

impl RawRestriction {
    pub fn new(value: impl Into<String>, conditions: Vec<RawCondition>) -> Self {
        Self {
            value: value.into(),
            conditions,
        }
    }
}

/// A single condition of a clause, still as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCondition {
    pub text: String,
    /// False for non-temporal conditions such as `weight>7.5`.
    pub is_opening_hours: bool,
}

impl RawCondition {
    pub fn opening_hours(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_opening_hours: true,
        }
    }

    pub fn other(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_opening_hours: false,
        }
    }
}

/// Splits `value @ (conditions); value @ ...` into clauses.
pub trait RestrictionGrammar: Send + Sync {
    fn restrictions(&self, raw: &str) -> Result<Vec<RawRestriction>, GrammarError>;
}

/// Parses an opening-hours expression into disjunctive rules.
pub trait OpeningHoursGrammar: Send + Sync {
    fn rules(&self, text: &str) -> Result<Vec<Rule>, GrammarError>;
}
