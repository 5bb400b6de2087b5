//! Civil time at an edge's location.
//!
//! Conditional restrictions are written in local wall-clock terms ("Mo-Fr
//! 06:00-20:00"), so every evaluation works on the civil date and the minute
//! of day in the zone of the edge, never on the raw instant.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Weekday};
use std::fmt;

/// Minutes in a civil day. Time spans may end past this value when they
/// cross midnight.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// An absolute instant expressed in the civil calendar of one location.
///
/// # Examples
///
/// ```
/// use conditional_router::domain::ZonedInstant;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let time = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
/// let instant = ZonedInstant::new(date, time);
/// assert_eq!(instant.minute_of_day(), 14 * 60 + 30);
/// assert_eq!(instant.to_string(), "2024-03-15 14:30 (Fri)");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZonedInstant {
    date: NaiveDate,
    minute_of_day: u32,
}

impl ZonedInstant {
    /// Create a zoned instant from a civil date and wall-clock time.
    ///
    /// Seconds are truncated; restriction syntax has minute resolution.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            minute_of_day: time.hour() * 60 + time.minute(),
        }
    }

    /// Take the civil date and time of a zoned chrono timestamp.
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        Self::new(datetime.date_naive(), datetime.time())
    }

    /// Returns the civil date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the minute of day (0-1439).
    pub fn minute_of_day(&self) -> u32 {
        self.minute_of_day
    }

    /// Returns the weekday of the civil date.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// The ordinary evaluation view of this instant.
    pub fn time_point(&self) -> TimePoint {
        TimePoint::at(self.date, self.minute_of_day)
    }

    /// The view of this instant as seen from the previous civil day.
    ///
    /// 01:00 on a Saturday becomes minute 1500 of the Friday, which lets a
    /// span such as `22:00-26:00` written against Friday cover it.
    /// Returns `None` only at the lower bound of the calendar.
    pub fn extended_time_point(&self) -> Option<TimePoint> {
        let previous = self.date.pred_opt()?;
        Some(TimePoint::at(previous, self.minute_of_day + MINUTES_PER_DAY))
    }
}

impl fmt::Debug for ZonedInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZonedInstant({self})")
    }
}

impl fmt::Display for ZonedInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02} ({:?})",
            self.date,
            self.minute_of_day / 60,
            self.minute_of_day % 60,
            self.weekday()
        )
    }
}

/// The calendar fields a rule is tested against.
///
/// `minutes` is normally below [`MINUTES_PER_DAY`]; in the extended view it
/// runs from 1440 up to 2879 and the date fields describe the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePoint {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
    pub minutes: u32,
}

impl TimePoint {
    fn at(date: NaiveDate, minutes: u32) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            weekday: date.weekday(),
            minutes,
        }
    }
}
