//! Termination rules for the bidirectional search.
//!
//! Keys are balanced A* keys: `d_f(v) + p(v)` forward and `d_b(v) - p(v)`
//! backward, with `p(v) = (h(v, target) - h(source, v)) / 2`. With such keys
//! the search may stop once the two last settled keys add up to the best
//! known meeting weight, provided the backward distances are true lower
//! bounds. When they are not, only the forward frontier can prove
//! optimality, which it does once its key reaches `best + p(target)`.

use crate::config::CONDITIONAL_CAPACITY_CEILING;
use crate::graph::{EdgeState, NodeId, RoutingGraph};

/// Snapshot of both frontiers, as seen by a [`StoppingPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub finished_from: bool,
    pub finished_to: bool,
    /// Key of the node last settled forward.
    pub from_key: f64,
    /// Key of the node last settled backward.
    pub to_key: f64,
    /// Weight of the best meeting found so far.
    pub best: f64,
    /// Forward potential of the target.
    pub target_potential: f64,
    /// The backward frontier has settled a node it could not fully expand.
    pub backward_blocked: bool,
}

impl Progress {
    fn frontiers_meet(&self) -> bool {
        self.from_key + self.to_key >= self.best
    }

    fn forward_alone_done(&self) -> bool {
        self.from_key >= self.best + self.target_potential
    }
}

/// Decides when the search has converged.
pub trait StoppingPolicy {
    fn name(&self) -> &'static str;

    /// Working-set capacity to reserve for a requested size.
    fn capacity(&self, requested: usize) -> usize;

    /// Whether settling `node` backward makes the backward distances
    /// unusable as lower bounds.
    fn blocks_backward_stop<G: RoutingGraph>(&self, graph: &G, node: NodeId) -> bool;

    fn finished(&self, progress: &Progress) -> bool;
}

/// Plain bidirectional A* termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStopping;

impl StoppingPolicy for StandardStopping {
    fn name(&self) -> &'static str {
        "astarbi"
    }

    fn capacity(&self, requested: usize) -> usize {
        requested
    }

    fn blocks_backward_stop<G: RoutingGraph>(&self, _graph: &G, _node: NodeId) -> bool {
        false
    }

    fn finished(&self, progress: &Progress) -> bool {
        progress.finished_from || progress.finished_to || progress.frontiers_meet()
    }
}

/// Whether travelling into the edge's base node depends on the time of day.
pub(crate) fn is_time_dependent(edge: &EdgeState) -> bool {
    edge.conditional_access(true) || edge.conditional_speed(true)
}

/// Termination that stays correct around time-dependent edges.
///
/// The backward frontier has no arrival time, so it cannot tell whether a
/// conditional edge is open or how fast it is, and never traverses one.
/// Once it settles a node entered by such an edge, or by a virtual edge,
/// its distances stop being lower bounds and only the forward rule applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalStopping;

impl StoppingPolicy for ConditionalStopping {
    fn name(&self) -> &'static str {
        "astarbi|conditional"
    }

    fn capacity(&self, requested: usize) -> usize {
        requested.min(CONDITIONAL_CAPACITY_CEILING)
    }

    fn blocks_backward_stop<G: RoutingGraph>(&self, graph: &G, node: NodeId) -> bool {
        graph
            .edges(node)
            .iter()
            .any(|edge| edge.is_virtual || is_time_dependent(edge))
    }

    fn finished(&self, progress: &Progress) -> bool {
        if progress.finished_from {
            return true;
        }
        if progress.finished_to || progress.backward_blocked {
            return progress.forward_alone_done();
        }
        progress.frontiers_meet()
    }
}
