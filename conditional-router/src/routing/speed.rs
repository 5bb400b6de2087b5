//! Time-dependent edge speeds.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::conditional::{RestrictionCache, Restrictions, matches_restriction};
use crate::domain::parse_speed;
use crate::error::RoutingError;
use crate::graph::EdgeState;
use crate::storage::DedupValueStore;

use super::zone::ZonedTimeResolver;

/// Effective speed of an edge, taking conditional speed limits into account.
#[derive(Clone, Copy)]
pub struct SpeedCalculator<'a> {
    conditionals: &'a DedupValueStore,
    restrictions: &'a RestrictionCache,
    zones: ZonedTimeResolver<'a>,
    speed_factor: f64,
}

impl<'a> SpeedCalculator<'a> {
    pub fn new(
        conditionals: &'a DedupValueStore,
        restrictions: &'a RestrictionCache,
        zones: ZonedTimeResolver<'a>,
        speed_factor: f64,
    ) -> Self {
        Self {
            conditionals,
            restrictions,
            zones,
            speed_factor,
        }
    }

    /// Stored speed, ignoring conditional tags.
    pub fn base_speed(&self, edge: &EdgeState, reverse: bool) -> f64 {
        edge.speed(reverse)
    }

    /// Highest speed the edge can have at any time.
    ///
    /// Every conditional value that parses as a speed counts, derated by the
    /// speed factor.
    pub fn static_upper_bound(&self, edge: &EdgeState, reverse: bool) -> Result<f64, RoutingError> {
        let base = self.base_speed(edge, reverse);
        if !edge.conditional_speed(reverse) {
            return Ok(base);
        }

        let restrictions = self.restrictions_of(edge)?;
        Ok(restrictions
            .iter()
            .filter_map(|r| parse_speed(&r.value))
            .map(|speed| speed * self.speed_factor)
            .fold(base, f64::max))
    }

    /// Speed when entering the edge at `at`.
    ///
    /// Without an instant, or without a conditional speed tag, this is the
    /// stored speed. Otherwise the last written matching clause applies;
    /// when none matches, or its value is not a speed, the stored speed
    /// applies unchanged.
    pub fn speed_at(
        &self,
        edge: &EdgeState,
        reverse: bool,
        at: Option<DateTime<Utc>>,
    ) -> Result<f64, RoutingError> {
        let base = self.base_speed(edge, reverse);
        let Some(at) = at else {
            return Ok(base);
        };
        if !edge.conditional_speed(reverse) {
            return Ok(base);
        }

        let restrictions = self.restrictions_of(edge)?;
        if restrictions.is_empty() {
            return Ok(base);
        }

        let instant = self.zones.resolve(edge.entry_node(reverse), at)?;
        let Some(restriction) = restrictions
            .iter()
            .rev()
            .find(|r| matches_restriction(r, &instant))
        else {
            return Ok(base);
        };

        match parse_speed(&restriction.value) {
            Some(speed) => {
                let speed = speed * self.speed_factor;
                trace!(edge = edge.edge, %instant, speed, "Conditional speed applies");
                Ok(speed)
            }
            None => Ok(base),
        }
    }

    fn restrictions_of(&self, edge: &EdgeState) -> Result<Restrictions, RoutingError> {
        Ok(match self.conditionals.get_value(edge.original_edge)? {
            Some(text) => self.restrictions.parse(text),
            None => Restrictions::from(Vec::new()),
        })
    }
}
