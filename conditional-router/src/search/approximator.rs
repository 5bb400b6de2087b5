//! Lower bounds on the remaining weight, for A* potentials.

use geo::{Distance, Haversine};

use crate::graph::{NodeId, RoutingGraph};

/// Estimates the weight between two nodes without exceeding the true value.
pub trait WeightApproximator {
    fn approximate(&self, from: NodeId, to: NodeId) -> f64;
}

/// No estimate at all; turns A* into Dijkstra.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroApproximator;

impl WeightApproximator for ZeroApproximator {
    fn approximate(&self, _from: NodeId, _to: NodeId) -> f64 {
        0.0
    }
}

/// Great-circle distance driven at the fastest possible speed.
///
/// Nodes without coordinates estimate to zero.
pub struct BeelineApproximator<'g, G> {
    graph: &'g G,
    max_speed_kmh: f64,
}

impl<'g, G: RoutingGraph> BeelineApproximator<'g, G> {
    pub fn new(graph: &'g G, max_speed_kmh: f64) -> Self {
        Self {
            graph,
            max_speed_kmh,
        }
    }
}

impl<G: RoutingGraph> WeightApproximator for BeelineApproximator<'_, G> {
    fn approximate(&self, from: NodeId, to: NodeId) -> f64 {
        match (self.graph.coordinate(from), self.graph.coordinate(to)) {
            (Some(a), Some(b)) => Haversine.distance(a, b) / self.max_speed_kmh * 3.6,
            _ => 0.0,
        }
    }
}
