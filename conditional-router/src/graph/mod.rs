//! Road graph seam.
//!
//! The search and the weighting only need oriented edge views and node
//! coordinates. [`RoutingGraph`] exposes exactly that; [`InMemoryGraph`] is a
//! small adjacency-list implementation.

mod memory;

use geo::Point;

pub use memory::{EdgeSpec, InMemoryGraph};

pub type NodeId = usize;
pub type EdgeId = usize;

/// Per-direction attributes of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionFlags {
    /// Base speed in km/h.
    pub speed: f64,
    /// Travel is allowed regardless of time.
    pub access: bool,
    /// Access depends on a conditional restriction.
    pub conditional_access: bool,
    /// Speed depends on a conditional restriction.
    pub conditional_speed: bool,
}

impl DirectionFlags {
    pub fn open(speed: f64) -> Self {
        Self {
            speed,
            access: true,
            conditional_access: false,
            conditional_speed: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            speed: 0.0,
            access: false,
            conditional_access: false,
            conditional_speed: false,
        }
    }
}

/// An edge as seen from one of its end nodes.
///
/// `reverse == false` means travelling from `base` to `adj`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeState {
    pub edge: EdgeId,
    /// Edge whose stored attributes this one shares. Differs from `edge`
    /// only for virtual edges created by snapping a query point.
    pub original_edge: EdgeId,
    pub base: NodeId,
    pub adj: NodeId,
    /// Length in metres.
    pub distance: f64,
    pub forward: DirectionFlags,
    pub backward: DirectionFlags,
    pub is_virtual: bool,
    pub unfavored: bool,
}

impl EdgeState {
    fn flags(&self, reverse: bool) -> &DirectionFlags {
        if reverse {
            &self.backward
        } else {
            &self.forward
        }
    }

    pub fn speed(&self, reverse: bool) -> f64 {
        self.flags(reverse).speed
    }

    pub fn access(&self, reverse: bool) -> bool {
        self.flags(reverse).access
    }

    pub fn conditional_access(&self, reverse: bool) -> bool {
        self.flags(reverse).conditional_access
    }

    pub fn conditional_speed(&self, reverse: bool) -> bool {
        self.flags(reverse).conditional_speed
    }

    /// Node the traveller is at when entering the edge.
    pub fn entry_node(&self, reverse: bool) -> NodeId {
        if reverse { self.adj } else { self.base }
    }

    /// Node the traveller reaches at the end of the edge.
    pub fn exit_node(&self, reverse: bool) -> NodeId {
        if reverse { self.base } else { self.adj }
    }

    /// The same edge seen from `adj`.
    pub fn flipped(&self) -> Self {
        Self {
            base: self.adj,
            adj: self.base,
            forward: self.backward,
            backward: self.forward,
            ..*self
        }
    }
}

/// Read-only access to a road graph.
pub trait RoutingGraph {
    fn node_count(&self) -> usize;

    /// All edges touching `node`, oriented with `base == node`.
    /// Unknown nodes have no edges.
    fn edges(&self, node: NodeId) -> &[EdgeState];

    /// Location of `node`, if known.
    fn coordinate(&self, node: NodeId) -> Option<Point<f64>>;
}
