//! Domain types for time-dependent edge evaluation.
//!
//! This module contains the parsed restriction model, the civil-time view of
//! an arrival instant, and speed tag parsing. The types carry no behaviour
//! that depends on the graph or on storage.

mod restriction;
mod speed;
mod time;

pub use restriction::{
    Condition, ConditionGroup, DateBound, DateRange, Restriction, Rule, TimeSpan, WeekdayRange,
    YearRange,
};
pub use speed::{UNLIMITED_SPEED, WALK_SPEED, parse_speed};
pub use time::{MINUTES_PER_DAY, TimePoint, ZonedInstant};
