//! Parsed conditional restrictions.
//!
//! A conditional tag such as `no @ (Oct-Mar); yes @ (Mo-Fr 06:00-20:00)`
//! parses into one [`Restriction`] per clause. Each clause carries condition
//! groups (all must hold), each group carries conditions (all must hold) and
//! each condition is a disjunctive list of opening-hours [`Rule`]s.

use chrono::Weekday;

use super::time::MINUTES_PER_DAY;

/// One clause of a conditional string, e.g. `yes @ (Mo-Fr 06:00-20:00)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    /// The tag value that applies while the conditions hold ("yes", "no", "50").
    pub value: String,
    /// Groups that must all match for the clause to apply.
    pub groups: Vec<ConditionGroup>,
}

impl Restriction {
    /// Create a clause with a single condition group.
    pub fn new(value: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self {
            value: value.into(),
            groups: vec![ConditionGroup::new(conditions)],
        }
    }

    /// Whether the clause grants access.
    pub fn is_yes(&self) -> bool {
        self.value == "yes"
    }
}

/// Conditions combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionGroup {
    pub conditions: Vec<Condition>,
}

impl ConditionGroup {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }
}

/// An opening-hours expression: rules combined with OR.
///
/// A condition with no rules never matches. This is how a condition whose
/// text could not be parsed is represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    pub rules: Vec<Rule>,
}

impl Condition {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// A condition that matches nothing.
    pub fn unmatchable() -> Self {
        Self::default()
    }
}

/// A single opening-hours rule.
///
/// Empty categories are wildcards. A rule matches when every populated
/// category contains the time point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    pub years: Vec<YearRange>,
    pub dates: Vec<DateRange>,
    pub weekdays: Vec<WeekdayRange>,
    pub times: Vec<TimeSpan>,
}

impl Rule {
    /// A rule with no populated category; matches every instant.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn with_years(mut self, years: Vec<YearRange>) -> Self {
        self.years = years;
        self
    }

    pub fn with_dates(mut self, dates: Vec<DateRange>) -> Self {
        self.dates = dates;
        self
    }

    pub fn with_weekdays(mut self, weekdays: Vec<WeekdayRange>) -> Self {
        self.weekdays = weekdays;
        self
    }

    pub fn with_times(mut self, times: Vec<TimeSpan>) -> Self {
        self.times = times;
        self
    }

    /// Whether any time span runs past midnight.
    pub fn has_extended_time(&self) -> bool {
        self.times
            .iter()
            .any(|span| span.end.is_some_and(|end| end > MINUTES_PER_DAY))
    }
}

/// Inclusive year range. `start == None` matches any year; `end == None`
/// with a start matches the start year only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn single(year: i32) -> Self {
        Self {
            start: Some(year),
            end: None,
        }
    }
}

/// One end of a date range. A bound without a day covers the whole month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBound {
    pub year: Option<i32>,
    pub month: u32,
    pub day: Option<u32>,
}

impl DateBound {
    pub fn month(month: u32) -> Self {
        Self {
            year: None,
            month,
            day: None,
        }
    }

    pub fn month_day(month: u32, day: u32) -> Self {
        Self {
            year: None,
            month,
            day: Some(day),
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// Inclusive date range such as `Oct-Mar` or `Dec 24-Jan 06`.
///
/// Without years the range is cyclic, so `Oct-Mar` spans the turn of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateBound,
    pub end: Option<DateBound>,
}

impl DateRange {
    pub fn new(start: DateBound, end: DateBound) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn single(start: DateBound) -> Self {
        Self { start, end: None }
    }

    /// Month range, e.g. `DateRange::months(10, 3)` for `Oct-Mar`.
    pub fn months(start: u32, end: u32) -> Self {
        Self::new(DateBound::month(start), DateBound::month(end))
    }
}

/// Inclusive weekday range, compared by position from Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayRange {
    pub start: Option<Weekday>,
    pub end: Option<Weekday>,
}

impl WeekdayRange {
    pub fn new(start: Weekday, end: Weekday) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn single(day: Weekday) -> Self {
        Self {
            start: Some(day),
            end: None,
        }
    }
}

/// Inclusive span in minutes since local midnight.
///
/// `end` may exceed [`MINUTES_PER_DAY`]: `22:00-02:00` is `1320..=1560`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl TimeSpan {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Build a span from wall-clock hours and minutes. An end earlier than
    /// the start is taken to fall on the next day.
    pub fn hm(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Self {
        let start = start_h * 60 + start_m;
        let mut end = end_h * 60 + end_m;
        if end < start {
            end += MINUTES_PER_DAY;
        }
        Self::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hm_wraps_past_midnight() {
        assert_eq!(TimeSpan::hm(22, 0, 2, 0), TimeSpan::new(1320, 1560));
        assert_eq!(TimeSpan::hm(6, 0, 20, 0), TimeSpan::new(360, 1200));
    }

    #[test]
    fn extended_time_detection() {
        let overnight = Rule::always().with_times(vec![TimeSpan::hm(22, 0, 2, 0)]);
        let daytime = Rule::always().with_times(vec![TimeSpan::hm(6, 0, 20, 0)]);
        let until_midnight = Rule::always().with_times(vec![TimeSpan::new(1200, 1440)]);

        assert!(overnight.has_extended_time());
        assert!(!daytime.has_extended_time());
        assert!(!until_midnight.has_extended_time());
        assert!(!Rule::always().has_extended_time());
    }

    #[test]
    fn restriction_value_helpers() {
        assert!(Restriction::new("yes", vec![]).is_yes());
        assert!(!Restriction::new("no", vec![]).is_yes());
        assert!(!Restriction::new("Yes", vec![]).is_yes());
    }
}
