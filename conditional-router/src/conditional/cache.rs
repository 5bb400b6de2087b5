//! Memoized restriction parsing.
//!
//! Conditional strings repeat heavily across a road network (every segment
//! of a long street carries the same tag), so each distinct string is parsed
//! once for the lifetime of the cache. Parse failures are cached as an empty
//! result so a malformed string never reaches the grammar twice.
//!
//! The cache is never evicted. Its size grows with the number of distinct
//! strings seen, which is bounded by the graph it was built for.

use std::sync::Arc;

use moka::sync::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Condition, Restriction};

use super::grammar::{OpeningHoursGrammar, RawRestriction, RestrictionGrammar};

/// Parsed clauses for one raw string, in written order.
pub type Restrictions = Arc<[Restriction]>;

/// Parses conditional strings and remembers the result by exact text.
///
/// Safe to share between concurrent searches.
pub struct RestrictionCache {
    parsed: MokaCache<String, Restrictions>,
    restriction_grammar: Arc<dyn RestrictionGrammar>,
    opening_hours_grammar: Arc<dyn OpeningHoursGrammar>,
}

impl RestrictionCache {
    /// Create an empty cache backed by the given grammars.
    pub fn new(
        restriction_grammar: Arc<dyn RestrictionGrammar>,
        opening_hours_grammar: Arc<dyn OpeningHoursGrammar>,
    ) -> Self {
        Self {
            parsed: MokaCache::builder().build(),
            restriction_grammar,
            opening_hours_grammar,
        }
    }

    /// Parse a conditional string, consulting the cache first.
    ///
    /// An empty result means the string carries no usable time condition.
    pub fn parse(&self, raw: &str) -> Restrictions {
        if let Some(hit) = self.parsed.get(raw) {
            return hit;
        }
        self.parsed
            .get_with(raw.to_owned(), || self.parse_uncached(raw))
    }

    /// Number of distinct strings parsed so far.
    pub fn len(&self) -> u64 {
        self.parsed.run_pending_tasks();
        self.parsed.entry_count()
    }

    /// Returns true if nothing has been parsed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse_uncached(&self, raw: &str) -> Restrictions {
        let clauses = match self.restriction_grammar.restrictions(raw) {
            Ok(clauses) => clauses,
            Err(e) => {
                debug!(conditional = raw, error = %e, "Unparseable conditional, caching empty");
                return Arc::from(Vec::new());
            }
        };

        let restrictions: Restrictions = clauses
            .into_iter()
            .filter_map(|clause| self.parse_clause(clause))
            .collect();

        if restrictions.is_empty() {
            debug!(conditional = raw, "Conditional has no time-dependent clause");
        }
        restrictions
    }

    /// Keep only opening-hours conditions; a clause without any is dropped.
    fn parse_clause(&self, clause: RawRestriction) -> Option<Restriction> {
        let conditions: Vec<Condition> = clause
            .conditions
            .iter()
            .filter(|condition| condition.is_opening_hours)
            .map(|condition| match self.opening_hours_grammar.rules(&condition.text) {
                Ok(rules) => Condition::new(rules),
                Err(e) => {
                    debug!(
                        condition = %condition.text,
                        error = %e,
                        "Unparseable opening hours, condition will never match"
                    );
                    Condition::unmatchable()
                }
            })
            .collect();

        if conditions.is_empty() {
            return None;
        }
        Some(Restriction::new(clause.value, conditions))
    }
}
