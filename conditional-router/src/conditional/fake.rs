//! Table-driven grammars for tests.
//!
//! Serves fabricated ASTs for known strings and fails for anything else,
//! counting every call so tests can assert on memoization.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::Rule;

use super::cache::RestrictionCache;
use super::grammar::{
    GrammarError, OpeningHoursGrammar, RawCondition, RawRestriction, RestrictionGrammar,
};

#[derive(Default)]
pub(crate) struct FakeGrammar {
    restrictions: HashMap<String, Vec<RawRestriction>>,
    rules: HashMap<String, Vec<Rule>>,
    restriction_calls: AtomicUsize,
    rule_calls: AtomicUsize,
}

impl FakeGrammar {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a conditional string made of `(value, [opening-hours text])`
    /// clauses.
    pub(crate) fn clauses(mut self, raw: &str, clauses: Vec<(&str, Vec<&str>)>) -> Self {
        let parsed = clauses
            .into_iter()
            .map(|(value, conditions)| {
                RawRestriction::new(
                    value,
                    conditions
                        .into_iter()
                        .map(RawCondition::opening_hours)
                        .collect(),
                )
            })
            .collect();
        self.restrictions.insert(raw.to_string(), parsed);
        self
    }

    pub(crate) fn raw(mut self, raw: &str, restrictions: Vec<RawRestriction>) -> Self {
        self.restrictions.insert(raw.to_string(), restrictions);
        self
    }

    pub(crate) fn rules(mut self, text: &str, rules: Vec<Rule>) -> Self {
        self.rules.insert(text.to_string(), rules);
        self
    }

    pub(crate) fn restriction_calls(&self) -> usize {
        self.restriction_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn rule_calls(&self) -> usize {
        self.rule_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn into_cache(self) -> (Arc<Self>, RestrictionCache) {
        let grammar = Arc::new(self);
        let cache = RestrictionCache::new(grammar.clone(), grammar.clone());
        (grammar, cache)
    }
}

impl RestrictionGrammar for FakeGrammar {
    fn restrictions(&self, raw: &str) -> Result<Vec<RawRestriction>, GrammarError> {
        self.restriction_calls.fetch_add(1, Ordering::SeqCst);
        self.restrictions
            .get(raw)
            .cloned()
            .ok_or_else(|| GrammarError::new(format!("unexpected input: {raw}")))
    }
}

impl OpeningHoursGrammar for FakeGrammar {
    fn rules(&self, text: &str) -> Result<Vec<Rule>, GrammarError> {
        self.rule_calls.fetch_add(1, Ordering::SeqCst);
        self.rules
            .get(text)
            .cloned()
            .ok_or_else(|| GrammarError::new(format!("unexpected input: {text}")))
    }
}
