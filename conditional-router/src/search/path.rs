//! Search results.

use chrono::{DateTime, Duration, Utc};

use crate::error::RoutingError;
use crate::graph::{EdgeId, EdgeState, NodeId};
use crate::routing::TimeDependentWeighting;

/// One traversed edge, in travel direction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Step {
    pub(crate) edge: EdgeState,
    pub(crate) reverse: bool,
}

/// Result of a point-to-point search.
#[derive(Debug, Clone)]
pub struct Path {
    /// Whether source and target are connected.
    pub found: bool,
    /// Nodes from source to target. Empty when not found.
    pub nodes: Vec<NodeId>,
    /// Edge ids in travel order.
    pub edges: Vec<EdgeId>,
    /// Total weight (seconds), recomputed along the path from departure.
    pub weight: f64,
    /// Total length in metres.
    pub distance: f64,
    /// Travel time in milliseconds.
    pub time_millis: i64,
    pub departure: DateTime<Utc>,
    /// Nodes settled by the forward frontier.
    pub visited_from: usize,
    /// Nodes settled by the backward frontier.
    pub visited_to: usize,
    /// The node budget ran out before the search converged.
    pub limit_reached: bool,
    /// Name of the algorithm that produced this path.
    pub algorithm: &'static str,
}

impl Path {
    pub(crate) fn not_found(departure: DateTime<Utc>, algorithm: &'static str) -> Self {
        Self {
            found: false,
            nodes: Vec::new(),
            edges: Vec::new(),
            weight: f64::INFINITY,
            distance: 0.0,
            time_millis: 0,
            departure,
            visited_from: 0,
            visited_to: 0,
            limit_reached: false,
            algorithm,
        }
    }

    /// Walk `steps` from `source`, timing every edge at the instant it is
    /// entered.
    pub(crate) fn from_steps(
        source: NodeId,
        steps: &[Step],
        departure: DateTime<Utc>,
        weighting: &TimeDependentWeighting<'_>,
        algorithm: &'static str,
    ) -> Result<Self, RoutingError> {
        let mut path = Self::not_found(departure, algorithm);
        path.found = true;
        path.weight = 0.0;
        path.nodes.push(source);

        let mut at = departure;
        for step in steps {
            path.weight += weighting.weight(&step.edge, step.reverse, Some(at))?;
            let millis = weighting.calc_millis(&step.edge, step.reverse, Some(at))?;
            path.time_millis += millis;
            path.distance += step.edge.distance;
            path.edges.push(step.edge.edge);
            path.nodes.push(step.edge.exit_node(step.reverse));
            at = advance(at, millis);
        }
        Ok(path)
    }

    pub fn time(&self) -> Duration {
        Duration::milliseconds(self.time_millis)
    }

    /// Arrival at the target, if a path was found.
    pub fn arrival(&self) -> Option<DateTime<Utc>> {
        self.found.then(|| advance(self.departure, self.time_millis))
    }

    /// Total nodes settled by both frontiers.
    pub fn visited_nodes(&self) -> usize {
        self.visited_from + self.visited_to
    }
}

/// `at` plus `millis`, saturating at the end of representable time.
pub(crate) fn advance(at: DateTime<Utc>, millis: i64) -> DateTime<Utc> {
    at.checked_add_signed(Duration::milliseconds(millis))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::fixtures::{ContextBuilder, edge_from, utc};

    #[test]
    fn steps_are_timed_in_sequence() {
        let context = ContextBuilder::new().build();
        let weighting = context.weighting();
        // 100 m at 50 km/h is 7.2 s per edge.
        let steps = [
            Step {
                edge: edge_from(0, 1, 10),
                reverse: false,
            },
            Step {
                edge: edge_from(2, 1, 11),
                reverse: true,
            },
        ];
        let departure = utc(2024, 5, 1, 8, 0);

        let path = Path::from_steps(0, &steps, departure, &weighting, "test").unwrap();

        assert!(path.found);
        assert_eq!(path.nodes, vec![0, 1, 2]);
        assert_eq!(path.edges, vec![10, 11]);
        assert_eq!(path.distance, 200.0);
        assert_eq!(path.time_millis, 14_400);
        assert_eq!(path.time(), Duration::milliseconds(14_400));
        assert_eq!(path.arrival(), Some(departure + Duration::milliseconds(14_400)));
    }

    #[test]
    fn single_node_path() {
        let context = ContextBuilder::new().build();
        let departure = utc(2024, 5, 1, 8, 0);

        let path = Path::from_steps(4, &[], departure, &context.weighting(), "test").unwrap();

        assert!(path.found);
        assert_eq!(path.nodes, vec![4]);
        assert_eq!(path.weight, 0.0);
        assert_eq!(path.arrival(), Some(departure));
    }

    #[test]
    fn not_found_has_no_arrival() {
        let path = Path::not_found(utc(2024, 5, 1, 8, 0), "test");

        assert!(!path.found);
        assert_eq!(path.arrival(), None);
        assert!(path.weight.is_infinite());
    }
}
