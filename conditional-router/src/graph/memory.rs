//! Adjacency-list graph.

use geo::Point;

use crate::error::RoutingError;

use super::{DirectionFlags, EdgeId, EdgeState, NodeId, RoutingGraph};

/// Description of an edge to add to an [`InMemoryGraph`].
///
/// Both directions start open at the given speed.
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    from: NodeId,
    to: NodeId,
    distance: f64,
    forward: DirectionFlags,
    backward: DirectionFlags,
    original: Option<EdgeId>,
    unfavored: bool,
}

impl EdgeSpec {
    pub fn new(from: NodeId, to: NodeId, distance: f64, speed: f64) -> Self {
        Self {
            from,
            to,
            distance,
            forward: DirectionFlags::open(speed),
            backward: DirectionFlags::open(speed),
            original: None,
            unfavored: false,
        }
    }

    /// Close the `to -> from` direction.
    pub fn one_way(mut self) -> Self {
        self.backward = DirectionFlags::closed();
        self
    }

    /// Mark both open directions as carrying a conditional access tag.
    pub fn conditional_access(mut self) -> Self {
        self.forward.conditional_access = true;
        if self.backward.access {
            self.backward.conditional_access = true;
        }
        self
    }

    /// Mark both open directions as carrying a conditional speed tag.
    pub fn conditional_speed(mut self) -> Self {
        self.forward.conditional_speed = true;
        if self.backward.access {
            self.backward.conditional_speed = true;
        }
        self
    }

    pub fn with_forward(mut self, flags: DirectionFlags) -> Self {
        self.forward = flags;
        self
    }

    pub fn with_backward(mut self, flags: DirectionFlags) -> Self {
        self.backward = flags;
        self
    }

    /// Make this a virtual edge sharing the stored attributes of `original`.
    pub fn virtual_of(mut self, original: EdgeId) -> Self {
        self.original = Some(original);
        self
    }

    pub fn unfavored(mut self) -> Self {
        self.unfavored = true;
        self
    }
}

/// A graph held entirely in memory.
///
/// Every edge is stored twice, once per end node, so `edges(node)` is a
/// slice lookup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    coordinates: Vec<Option<Point<f64>>>,
    adjacency: Vec<Vec<EdgeState>>,
    edge_count: usize,
}

impl InMemoryGraph {
    pub fn new(node_count: usize) -> Self {
        Self {
            coordinates: vec![None; node_count],
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    pub fn set_coordinate(&mut self, node: NodeId, lat: f64, lon: f64) -> Result<(), RoutingError> {
        let slot = self
            .coordinates
            .get_mut(node)
            .ok_or(RoutingError::UnknownNode(node))?;
        *slot = Some(Point::new(lon, lat));
        Ok(())
    }

    /// Add an edge and return its id. Ids are assigned densely from zero.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> Result<EdgeId, RoutingError> {
        for node in [spec.from, spec.to] {
            if node >= self.adjacency.len() {
                return Err(RoutingError::UnknownNode(node));
            }
        }

        let edge = self.edge_count;
        self.edge_count += 1;

        let state = EdgeState {
            edge,
            original_edge: spec.original.unwrap_or(edge),
            base: spec.from,
            adj: spec.to,
            distance: spec.distance,
            forward: spec.forward,
            backward: spec.backward,
            is_virtual: spec.original.is_some(),
            unfavored: spec.unfavored,
        };
        self.adjacency[spec.from].push(state);
        if spec.from != spec.to {
            self.adjacency[spec.to].push(state.flipped());
        }
        Ok(edge)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

impl RoutingGraph for InMemoryGraph {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn edges(&self, node: NodeId) -> &[EdgeState] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn coordinate(&self, node: NodeId) -> Option<Point<f64>> {
        self.coordinates.get(node).copied().flatten()
    }
}
