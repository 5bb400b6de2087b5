//! Fastest-path weighting with time-dependent speeds.

use chrono::{DateTime, Utc};

use crate::error::RoutingError;
use crate::graph::EdgeState;

use super::speed::SpeedCalculator;

/// Travel time in seconds as edge weight.
#[derive(Clone, Copy)]
pub struct TimeDependentWeighting<'a> {
    speeds: SpeedCalculator<'a>,
    heading_penalty_secs: f64,
}

impl<'a> TimeDependentWeighting<'a> {
    pub fn new(speeds: SpeedCalculator<'a>, heading_penalty_secs: f64) -> Self {
        Self {
            speeds,
            heading_penalty_secs,
        }
    }

    pub fn speeds(&self) -> &SpeedCalculator<'a> {
        &self.speeds
    }

    /// Seconds to traverse `edge` when entering it at `at`.
    ///
    /// `f64::INFINITY` when the effective speed is zero.
    pub fn weight(
        &self,
        edge: &EdgeState,
        reverse: bool,
        at: Option<DateTime<Utc>>,
    ) -> Result<f64, RoutingError> {
        let speed = self.speeds.speed_at(edge, reverse, at)?;
        if speed == 0.0 {
            return Ok(f64::INFINITY);
        }
        Ok(seconds(edge.distance, speed) + self.penalty(edge))
    }

    /// Milliseconds to traverse `edge` when entering it at `at`.
    ///
    /// A closed edge has no travel time; asking for one is an error.
    pub fn calc_millis(
        &self,
        edge: &EdgeState,
        reverse: bool,
        at: Option<DateTime<Utc>>,
    ) -> Result<i64, RoutingError> {
        let speed = self.speeds.speed_at(edge, reverse, at)?;
        if speed == 0.0 {
            return Err(RoutingError::ZeroSpeed { edge: edge.edge });
        }
        let secs = seconds(edge.distance, speed) + self.penalty(edge);
        Ok((secs * 1000.0).round() as i64)
    }

    fn penalty(&self, edge: &EdgeState) -> f64 {
        if edge.unfavored {
            self.heading_penalty_secs
        } else {
            0.0
        }
    }
}

/// Seconds to cover `distance` metres at `speed` km/h.
fn seconds(distance: f64, speed: f64) -> f64 {
    distance / speed * 3.6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rule, TimeSpan};
    use crate::routing::fixtures::{ContextBuilder, edge_from, utc};

    #[test]
    fn weight_is_travel_time() {
        let context = ContextBuilder::new().build();
        let mut edge = edge_from(0, 1, 0);
        edge.distance = 1000.0;
        edge.forward.speed = 10.0;

        let weighting = context.weighting();
        assert_eq!(weighting.weight(&edge, false, None).unwrap(), 360.0);
        assert_eq!(weighting.calc_millis(&edge, false, None).unwrap(), 360_000);
    }

    #[test]
    fn unfavored_edges_pay_the_heading_penalty() {
        let context = ContextBuilder::new().build();
        let mut edge = edge_from(0, 1, 0);
        edge.distance = 1000.0;
        edge.forward.speed = 10.0;
        edge.unfavored = true;

        let weighting = context.weighting();
        assert_eq!(weighting.weight(&edge, false, None).unwrap(), 660.0);
        assert_eq!(weighting.calc_millis(&edge, false, None).unwrap(), 660_000);
    }

    #[test]
    fn zero_speed_is_infinite_weight_but_no_time() {
        let context = ContextBuilder::new().build();
        let mut edge = edge_from(0, 1, 5);
        edge.forward.speed = 0.0;

        let weighting = context.weighting();
        assert_eq!(weighting.weight(&edge, false, None).unwrap(), f64::INFINITY);
        assert!(matches!(
            weighting.calc_millis(&edge, false, None),
            Err(RoutingError::ZeroSpeed { edge: 5 })
        ));
    }

    #[test]
    fn conditional_zero_speed_closes_the_edge_at_that_time() {
        let context = ContextBuilder::new()
            .timezone(0, "UTC")
            .rules("22:00-06:00", vec![Rule::always().with_times(vec![TimeSpan::hm(22, 0, 6, 0)])])
            .speed(2, "0 @ (22:00-06:00)", vec![("0", vec!["22:00-06:00"])])
            .build();
        let mut edge = edge_from(0, 1, 2);
        edge.distance = 500.0;
        edge.forward.conditional_speed = true;

        let weighting = context.weighting();
        let night = Some(utc(2024, 5, 1, 23, 0));
        let noon = Some(utc(2024, 5, 1, 12, 0));

        assert_eq!(weighting.weight(&edge, false, night).unwrap(), f64::INFINITY);
        assert!(weighting.weight(&edge, false, noon).unwrap().is_finite());
    }
}
