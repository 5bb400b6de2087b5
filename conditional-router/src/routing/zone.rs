//! Arrival instants in the civil time of a node.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::ZonedInstant;
use crate::error::RoutingError;
use crate::graph::NodeId;
use crate::storage::DedupValueStore;

/// Resolves instants against the timezone stored for each node.
#[derive(Debug, Clone, Copy)]
pub struct ZonedTimeResolver<'a> {
    timezones: &'a DedupValueStore,
}

impl<'a> ZonedTimeResolver<'a> {
    pub fn new(timezones: &'a DedupValueStore) -> Self {
        Self { timezones }
    }

    /// The timezone of `node`.
    ///
    /// Unknown zone names are an error, never a silent fallback to UTC.
    pub fn zone(&self, node: NodeId) -> Result<Tz, RoutingError> {
        let name = self
            .timezones
            .get_value(node)?
            .ok_or(RoutingError::MissingZone { node })?;
        name.parse::<Tz>().map_err(|_| RoutingError::UnknownZone {
            node,
            zone: name.to_string(),
        })
    }

    /// `at` as civil date and minute of day at `node`.
    pub fn resolve(&self, node: NodeId, at: DateTime<Utc>) -> Result<ZonedInstant, RoutingError> {
        let zone = self.zone(node)?;
        Ok(ZonedInstant::from_datetime(&at.with_timezone(&zone)))
    }
}
