//! Shared state for time-dependent routing on one graph.

use std::path::Path;

use tracing::info;

use crate::conditional::RestrictionCache;
use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::storage::{DedupValueStore, EntryWidth, StoreConfig};

use super::access::ConditionalAccessFilter;
use super::speed::SpeedCalculator;
use super::weighting::TimeDependentWeighting;
use super::zone::ZonedTimeResolver;

pub const CONDITIONAL_ACCESS_STORE: &str = "conditional_access";
pub const CONDITIONAL_SPEED_STORE: &str = "conditional_speed";
pub const TIMEZONE_STORE: &str = "timezones";

/// Store layout used by [`TimeDependentContext::load`].
///
/// Conditional text is keyed by original edge id with 4-byte entries;
/// timezones are keyed by node id with 2-byte entries.
pub fn store_configs(directory: &Path) -> [StoreConfig; 3] {
    [
        StoreConfig::new(directory, CONDITIONAL_ACCESS_STORE).with_width(EntryWidth::Int),
        StoreConfig::new(directory, CONDITIONAL_SPEED_STORE).with_width(EntryWidth::Int),
        StoreConfig::new(directory, TIMEZONE_STORE).with_width(EntryWidth::Short),
    ]
}

/// Owns the per-graph stores and the restriction cache.
///
/// Built once per loaded graph and read-only afterwards, so one context can
/// serve concurrent searches. Filters, speed calculators and weightings
/// borrow from it.
pub struct TimeDependentContext {
    conditional_access: DedupValueStore,
    conditional_speed: DedupValueStore,
    timezones: DedupValueStore,
    restrictions: RestrictionCache,
    config: RoutingConfig,
}

impl TimeDependentContext {
    pub fn new(
        conditional_access: DedupValueStore,
        conditional_speed: DedupValueStore,
        timezones: DedupValueStore,
        restrictions: RestrictionCache,
        config: RoutingConfig,
    ) -> Self {
        Self {
            conditional_access,
            conditional_speed,
            timezones,
            restrictions,
            config,
        }
    }

    /// Open the three stores persisted in `directory`.
    pub fn load(
        directory: impl AsRef<Path>,
        restrictions: RestrictionCache,
        config: RoutingConfig,
    ) -> Result<Self, RoutingError> {
        let mut stores = store_configs(directory.as_ref()).map(DedupValueStore::new);
        for store in &mut stores {
            store.load_existing()?;
        }
        let [conditional_access, conditional_speed, timezones] = stores;

        info!(
            directory = %directory.as_ref().display(),
            access_edges = conditional_access.entries()?,
            speed_edges = conditional_speed.entries()?,
            zoned_nodes = timezones.entries()?,
            "Loaded time-dependent context"
        );
        Ok(Self::new(
            conditional_access,
            conditional_speed,
            timezones,
            restrictions,
            config,
        ))
    }

    /// Write all stores to their directories.
    pub fn flush(&self) -> Result<(), RoutingError> {
        self.conditional_access.flush()?;
        self.conditional_speed.flush()?;
        self.timezones.flush()?;
        Ok(())
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn restrictions(&self) -> &RestrictionCache {
        &self.restrictions
    }

    pub fn zones(&self) -> ZonedTimeResolver<'_> {
        ZonedTimeResolver::new(&self.timezones)
    }

    pub fn access_filter(&self) -> ConditionalAccessFilter<'_> {
        ConditionalAccessFilter::new(&self.conditional_access, &self.restrictions, self.zones())
    }

    pub fn speed_calculator(&self) -> SpeedCalculator<'_> {
        SpeedCalculator::new(
            &self.conditional_speed,
            &self.restrictions,
            self.zones(),
            self.config.speed_factor,
        )
    }

    pub fn weighting(&self) -> TimeDependentWeighting<'_> {
        TimeDependentWeighting::new(
            self.speed_calculator(),
            self.config.heading_penalty_secs as f64,
        )
    }
}
