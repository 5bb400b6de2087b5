//! Time-dependent edge access.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::conditional::{RestrictionCache, matches_restriction};
use crate::error::RoutingError;
use crate::graph::EdgeState;
use crate::storage::DedupValueStore;

use super::zone::ZonedTimeResolver;

/// Decides whether a conditionally tagged edge can be entered at an instant.
#[derive(Clone, Copy)]
pub struct ConditionalAccessFilter<'a> {
    conditionals: &'a DedupValueStore,
    restrictions: &'a RestrictionCache,
    zones: ZonedTimeResolver<'a>,
}

impl<'a> ConditionalAccessFilter<'a> {
    pub fn new(
        conditionals: &'a DedupValueStore,
        restrictions: &'a RestrictionCache,
        zones: ZonedTimeResolver<'a>,
    ) -> Self {
        Self {
            conditionals,
            restrictions,
            zones,
        }
    }

    /// Whether the conditional tag of `edge` permits entering it at `at`.
    ///
    /// Edges without a conditional tag in this direction are always
    /// accepted. Clauses are tried last to first and the first match
    /// decides. When nothing matches, the opposite of the first written
    /// clause applies. A tagged edge whose text yields no clause is refused.
    pub fn accept(
        &self,
        edge: &EdgeState,
        reverse: bool,
        at: DateTime<Utc>,
    ) -> Result<bool, RoutingError> {
        if !edge.conditional_access(reverse) {
            return Ok(true);
        }

        let Some(text) = self.conditionals.get_value(edge.original_edge)? else {
            trace!(edge = edge.edge, "Conditional edge has no stored text, refusing");
            return Ok(false);
        };

        let restrictions = self.restrictions.parse(text);
        if restrictions.is_empty() {
            trace!(edge = edge.edge, conditional = text, "No usable clause, refusing");
            return Ok(false);
        }

        let instant = self.zones.resolve(edge.entry_node(reverse), at)?;

        let mut match_value = false;
        for restriction in restrictions.iter().rev() {
            match_value = restriction.is_yes();
            if matches_restriction(restriction, &instant) {
                trace!(
                    edge = edge.edge,
                    conditional = text,
                    %instant,
                    accepted = match_value,
                    "Conditional clause matched"
                );
                return Ok(match_value);
            }
        }

        trace!(
            edge = edge.edge,
            conditional = text,
            %instant,
            accepted = !match_value,
            "No conditional clause matched"
        );
        Ok(!match_value)
    }
}
