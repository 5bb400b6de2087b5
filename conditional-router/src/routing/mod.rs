//! Time-dependent edge evaluation.
//!
//! An arrival instant is turned into civil time at the edge's location
//! ([`ZonedTimeResolver`]), checked against the edge's conditional access
//! tag ([`ConditionalAccessFilter`]) and used to pick its effective speed
//! ([`SpeedCalculator`]). [`TimeDependentWeighting`] turns that speed into
//! travel time. All of them borrow from a [`TimeDependentContext`].

mod access;
mod context;
#[cfg(test)]
pub(crate) mod fixtures;
mod speed;
mod weighting;
mod zone;

pub use access::ConditionalAccessFilter;
pub use context::{
    CONDITIONAL_ACCESS_STORE, CONDITIONAL_SPEED_STORE, TIMEZONE_STORE, TimeDependentContext,
    store_configs,
};
pub use speed::SpeedCalculator;
pub use weighting::TimeDependentWeighting;
pub use zone::ZonedTimeResolver;
