//! Rule matching against a zoned instant.
//!
//! Matching is AND across the groups of a clause and across the conditions
//! of a group, OR across the rules of a condition, and AND across the
//! populated categories of a rule. Ranges are inclusive.
//!
//! Rules with a time span past midnight are tested twice: once against the
//! instant as is, and once against the same instant seen from the previous
//! day with 24h added to its minute of day. A `22:00-02:00` Friday rule
//! therefore covers Friday 23:30 (ordinary view) and Saturday 01:00
//! (extended view, Friday minute 1500).

use crate::domain::{
    Condition, ConditionGroup, DateBound, DateRange, Restriction, Rule, TimePoint, TimeSpan,
    WeekdayRange, YearRange, ZonedInstant,
};

/// Whether every group of the clause matches.
pub fn matches_restriction(restriction: &Restriction, instant: &ZonedInstant) -> bool {
    matches_groups(&restriction.groups, instant)
}

/// Whether every group matches.
pub fn matches_groups(groups: &[ConditionGroup], instant: &ZonedInstant) -> bool {
    groups.iter().all(|group| matches_group(group, instant))
}

/// Whether every condition of the group matches.
pub fn matches_group(group: &ConditionGroup, instant: &ZonedInstant) -> bool {
    group
        .conditions
        .iter()
        .all(|condition| matches_condition(condition, instant))
}

/// Whether any rule of the condition matches, in either view.
pub fn matches_condition(condition: &Condition, instant: &ZonedInstant) -> bool {
    let ordinary = instant.time_point();
    let extended = instant.extended_time_point();

    condition.rules.iter().any(|rule| {
        matches_rule(rule, &ordinary)
            || (rule.has_extended_time()
                && extended.is_some_and(|point| matches_rule(rule, &point)))
    })
}

/// Whether a single rule contains the time point.
pub fn matches_rule(rule: &Rule, point: &TimePoint) -> bool {
    if !rule.years.is_empty() && !rule.years.iter().any(|r| in_year_range(point, r)) {
        return false;
    }
    if !rule.dates.is_empty() && !rule.dates.iter().any(|r| in_date_range(point, r)) {
        return false;
    }
    if !rule.weekdays.is_empty() && !rule.weekdays.iter().any(|r| in_weekday_range(point, r)) {
        return false;
    }
    if !rule.times.is_empty() && !rule.times.iter().any(|s| in_time_span(point, s)) {
        return false;
    }
    true
}

/// Linear containment with the wildcard and exact-match conventions.
fn in_range<T: PartialOrd>(value: T, start: Option<T>, end: Option<T>) -> bool {
    match (start, end) {
        (None, _) => true,
        (Some(start), None) => value == start,
        (Some(start), Some(end)) => value >= start && value <= end,
    }
}

fn in_year_range(point: &TimePoint, range: &YearRange) -> bool {
    in_range(point.year, range.start, range.end)
}

fn in_weekday_range(point: &TimePoint, range: &WeekdayRange) -> bool {
    in_range(
        point.weekday.num_days_from_monday(),
        range.start.map(|d| d.num_days_from_monday()),
        range.end.map(|d| d.num_days_from_monday()),
    )
}

fn in_time_span(point: &TimePoint, span: &TimeSpan) -> bool {
    in_range(point.minutes, span.start, span.end)
}

const LAST_DAY: u32 = 31;

fn in_date_range(point: &TimePoint, range: &DateRange) -> bool {
    let Some(end) = range.end else {
        return matches_single_date(point, &range.start);
    };
    let start = range.start;

    if start.year.is_some() || end.year.is_some() {
        // Anchored range: compare full dates, borrowing the missing year.
        let start_year = start.year.unwrap_or(point.year);
        let end_year = end.year.unwrap_or(start_year);
        let value = (point.year, point.month, point.day);
        let from = (start_year, start.month, start.day.unwrap_or(1));
        let to = (end_year, end.month, end.day.unwrap_or(LAST_DAY));
        return value >= from && value <= to;
    }

    // Cyclic range: Oct-Mar wraps through the new year.
    let value = (point.month, point.day);
    let from = (start.month, start.day.unwrap_or(1));
    let to = (end.month, end.day.unwrap_or(LAST_DAY));
    if from <= to {
        value >= from && value <= to
    } else {
        value >= from || value <= to
    }
}

fn matches_single_date(point: &TimePoint, bound: &DateBound) -> bool {
    bound.year.is_none_or(|year| year == point.year)
        && bound.month == point.month
        && bound.day.is_none_or(|day| day == point.day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> ZonedInstant {
        ZonedInstant::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(hh, mm, 0).unwrap(),
        )
    }

    fn condition(rules: Vec<Rule>) -> Condition {
        Condition::new(rules)
    }

    fn times(span: TimeSpan) -> Rule {
        Rule::always().with_times(vec![span])
    }

    #[test]
    fn midnight_crossing_span() {
        let overnight = condition(vec![times(TimeSpan::new(1320, 1560))]);

        assert!(matches_condition(&overnight, &at(2024, 3, 15, 23, 30)));
        assert!(matches_condition(&overnight, &at(2024, 3, 16, 1, 0)));
        assert!(matches_condition(&overnight, &at(2024, 3, 16, 2, 0)));
        assert!(!matches_condition(&overnight, &at(2024, 3, 16, 2, 1)));
        assert!(!matches_condition(&overnight, &at(2024, 3, 15, 12, 0)));
        assert!(!matches_condition(&overnight, &at(2024, 3, 15, 21, 59)));
    }

    #[test]
    fn overnight_span_keeps_the_weekday_of_its_start() {
        // Fr 22:00-02:00 covers early Saturday, but not early Friday.
        let friday_night = condition(vec![
            Rule::always()
                .with_weekdays(vec![WeekdayRange::single(Weekday::Fri)])
                .with_times(vec![TimeSpan::hm(22, 0, 2, 0)]),
        ]);

        // 2024-03-15 is a Friday.
        assert!(matches_condition(&friday_night, &at(2024, 3, 15, 23, 0)));
        assert!(matches_condition(&friday_night, &at(2024, 3, 16, 1, 30)));
        assert!(!matches_condition(&friday_night, &at(2024, 3, 15, 1, 30)));
    }

    #[test]
    fn extended_view_is_only_used_for_overnight_rules() {
        // A rule for Friday daytime must not match Saturday via the
        // previous-day view.
        let friday = condition(vec![
            Rule::always()
                .with_weekdays(vec![WeekdayRange::single(Weekday::Fri)])
                .with_times(vec![TimeSpan::new(0, 1440)]),
        ]);

        assert!(!matches_condition(&friday, &at(2024, 3, 16, 0, 30)));
        assert!(matches_condition(&friday, &at(2024, 3, 15, 0, 30)));
    }

    #[test]
    fn weekday_ranges_are_linear() {
        let weekdays = condition(vec![
            Rule::always().with_weekdays(vec![WeekdayRange::new(Weekday::Mon, Weekday::Fri)]),
        ]);

        assert!(matches_condition(&weekdays, &at(2024, 3, 11, 8, 0))); // Mon
        assert!(matches_condition(&weekdays, &at(2024, 3, 15, 8, 0))); // Fri
        assert!(!matches_condition(&weekdays, &at(2024, 3, 16, 8, 0))); // Sat
        assert!(!matches_condition(&weekdays, &at(2024, 3, 17, 8, 0))); // Sun
    }

    #[test]
    fn unset_bounds() {
        let point = at(2024, 3, 15, 10, 0).time_point();

        let wildcard = Rule::always().with_years(vec![YearRange {
            start: None,
            end: Some(1990),
        }]);
        assert!(matches_rule(&wildcard, &point));

        let exact = Rule::always().with_years(vec![YearRange::single(2024)]);
        assert!(matches_rule(&exact, &point));

        let other_year = Rule::always().with_years(vec![YearRange::single(2023)]);
        assert!(!matches_rule(&other_year, &point));

        let exact_minute = Rule::always().with_times(vec![TimeSpan {
            start: Some(600),
            end: None,
        }]);
        assert!(matches_rule(&exact_minute, &point));
        let later_minute = Rule::always().with_times(vec![TimeSpan {
            start: Some(601),
            end: None,
        }]);
        assert!(!matches_rule(&later_minute, &point));
    }

    #[test]
    fn year_ranges() {
        let rule = Rule::always().with_years(vec![YearRange::new(2020, 2025)]);

        assert!(matches_rule(&rule, &at(2020, 1, 1, 0, 0).time_point()));
        assert!(matches_rule(&rule, &at(2025, 12, 31, 0, 0).time_point()));
        assert!(!matches_rule(&rule, &at(2026, 1, 1, 0, 0).time_point()));
    }

    #[test]
    fn cyclic_month_range_spans_new_year() {
        let winter = Rule::always().with_dates(vec![DateRange::months(10, 3)]);

        assert!(matches_rule(&winter, &at(2024, 10, 1, 0, 0).time_point()));
        assert!(matches_rule(&winter, &at(2024, 12, 31, 0, 0).time_point()));
        assert!(matches_rule(&winter, &at(2025, 1, 15, 0, 0).time_point()));
        assert!(matches_rule(&winter, &at(2025, 3, 31, 0, 0).time_point()));
        assert!(!matches_rule(&winter, &at(2025, 4, 1, 0, 0).time_point()));
        assert!(!matches_rule(&winter, &at(2024, 9, 30, 0, 0).time_point()));
    }

    #[test]
    fn month_day_ranges() {
        let holidays = Rule::always().with_dates(vec![DateRange::new(
            DateBound::month_day(12, 24),
            DateBound::month_day(1, 6),
        )]);

        assert!(matches_rule(&holidays, &at(2024, 12, 24, 0, 0).time_point()));
        assert!(matches_rule(&holidays, &at(2025, 1, 6, 0, 0).time_point()));
        assert!(!matches_rule(&holidays, &at(2024, 12, 23, 0, 0).time_point()));
        assert!(!matches_rule(&holidays, &at(2025, 1, 7, 0, 0).time_point()));
    }

    #[test]
    fn anchored_date_ranges() {
        let works = Rule::always().with_dates(vec![DateRange::new(
            DateBound::month_day(11, 1).with_year(2024),
            DateBound::month_day(2, 28).with_year(2025),
        )]);

        assert!(matches_rule(&works, &at(2024, 11, 1, 0, 0).time_point()));
        assert!(matches_rule(&works, &at(2025, 1, 10, 0, 0).time_point()));
        assert!(!matches_rule(&works, &at(2025, 11, 1, 0, 0).time_point()));
        assert!(!matches_rule(&works, &at(2024, 2, 1, 0, 0).time_point()));
    }

    #[test]
    fn single_dates() {
        let christmas = Rule::always().with_dates(vec![DateRange::single(
            DateBound::month_day(12, 25),
        )]);
        let december = Rule::always().with_dates(vec![DateRange::single(DateBound::month(12))]);

        assert!(matches_rule(&christmas, &at(2024, 12, 25, 9, 0).time_point()));
        assert!(!matches_rule(&christmas, &at(2024, 12, 26, 9, 0).time_point()));
        assert!(matches_rule(&december, &at(2024, 12, 2, 9, 0).time_point()));
        assert!(!matches_rule(&december, &at(2024, 11, 30, 9, 0).time_point()));
    }

    #[test]
    fn categories_combine_with_and() {
        let rule = Rule::always()
            .with_weekdays(vec![WeekdayRange::new(Weekday::Mon, Weekday::Fri)])
            .with_times(vec![TimeSpan::hm(6, 0, 20, 0)]);

        assert!(matches_rule(&rule, &at(2024, 3, 15, 7, 0).time_point()));
        assert!(!matches_rule(&rule, &at(2024, 3, 15, 21, 0).time_point()));
        assert!(!matches_rule(&rule, &at(2024, 3, 16, 7, 0).time_point()));
    }

    #[test]
    fn rules_combine_with_or() {
        let either = condition(vec![
            Rule::always().with_weekdays(vec![WeekdayRange::single(Weekday::Sat)]),
            Rule::always().with_times(vec![TimeSpan::hm(6, 0, 8, 0)]),
        ]);

        assert!(matches_condition(&either, &at(2024, 3, 16, 12, 0)));
        assert!(matches_condition(&either, &at(2024, 3, 15, 7, 0)));
        assert!(!matches_condition(&either, &at(2024, 3, 15, 12, 0)));
    }

    #[test]
    fn conditions_and_groups_combine_with_and() {
        let weekdays = condition(vec![
            Rule::always().with_weekdays(vec![WeekdayRange::new(Weekday::Mon, Weekday::Fri)]),
        ]);
        let morning = condition(vec![times(TimeSpan::hm(6, 0, 10, 0))]);
        let restriction = Restriction::new("no", vec![weekdays.clone(), morning.clone()]);

        assert!(matches_restriction(&restriction, &at(2024, 3, 15, 7, 0)));
        assert!(!matches_restriction(&restriction, &at(2024, 3, 15, 11, 0)));

        let split = Restriction {
            value: "no".into(),
            groups: vec![
                ConditionGroup::new(vec![weekdays]),
                ConditionGroup::new(vec![morning]),
            ],
        };
        assert!(matches_restriction(&split, &at(2024, 3, 15, 7, 0)));
        assert!(!matches_restriction(&split, &at(2024, 3, 16, 7, 0)));
    }

    #[test]
    fn unmatchable_condition_never_matches() {
        assert!(!matches_condition(
            &Condition::unmatchable(),
            &at(2024, 3, 15, 7, 0)
        ));
    }
}
