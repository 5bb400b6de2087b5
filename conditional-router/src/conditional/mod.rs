//! Conditional restriction parsing and evaluation.
//!
//! Raw conditional strings are turned into [`Restriction`](crate::domain::Restriction)
//! lists by injected grammars, memoized in a [`RestrictionCache`], and
//! evaluated against a [`ZonedInstant`](crate::domain::ZonedInstant) by the
//! functions in [`evaluator`].

mod cache;
pub mod evaluator;
#[cfg(test)]
pub(crate) mod fake;
mod grammar;

pub use cache::{RestrictionCache, Restrictions};
pub use evaluator::{matches_condition, matches_group, matches_groups, matches_restriction};
pub use grammar::{
    GrammarError, OpeningHoursGrammar, RawCondition, RawRestriction, RestrictionGrammar,
};
