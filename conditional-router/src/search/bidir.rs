//! Bidirectional A* over time-dependent edges.
//!
//! The forward frontier knows the departure time and carries an arrival
//! instant on every label, so it filters and weights edges at the time they
//! are actually entered. The backward frontier has no absolute time, so it
//! never crosses an edge whose access or speed is conditional; every weight
//! it accumulates is exact whenever the edge is entered. The two frontiers
//! alternate, one expansion each per round, until the [`StoppingPolicy`]
//! says they have converged.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::error::RoutingError;
use crate::graph::{EdgeState, NodeId, RoutingGraph};
use crate::routing::{ConditionalAccessFilter, TimeDependentContext, TimeDependentWeighting};

use super::approximator::WeightApproximator;
use super::path::{Path, Step, advance};
use super::stopping::{
    ConditionalStopping, Progress, StandardStopping, StoppingPolicy, is_time_dependent,
};

#[derive(Debug, Clone, Copy)]
struct Label {
    weight: f64,
    /// Instant the node is reached. Forward labels only.
    arrival: Option<DateTime<Utc>>,
    /// Previous node towards the frontier's root, and the edge as seen from it.
    parent: Option<(NodeId, EdgeState)>,
    settled: bool,
}

/// One direction's open set and labels.
struct Frontier {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>>,
    labels: HashMap<NodeId, Label>,
    current_key: f64,
    finished: bool,
    visited: usize,
}

impl Frontier {
    fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            labels: HashMap::with_capacity(capacity),
            current_key: f64::NEG_INFINITY,
            finished: false,
            visited: 0,
        }
    }

    fn seed(&mut self, node: NodeId, key: f64, arrival: Option<DateTime<Utc>>) {
        self.labels.insert(
            node,
            Label {
                weight: 0.0,
                arrival,
                parent: None,
                settled: false,
            },
        );
        self.heap.push(Reverse((OrderedFloat(key), node)));
        self.current_key = key;
    }

    /// Pop and settle the best open node. Stale heap entries are skipped.
    fn settle_next(&mut self) -> Option<(NodeId, Label)> {
        while let Some(Reverse((key, node))) = self.heap.pop() {
            let Some(label) = self.labels.get_mut(&node) else {
                continue;
            };
            if label.settled {
                continue;
            }
            label.settled = true;
            self.current_key = key.into_inner();
            self.visited += 1;
            return Some((node, *label));
        }
        None
    }

    fn is_settled(&self, node: NodeId) -> bool {
        self.labels.get(&node).is_some_and(|label| label.settled)
    }

    fn weight(&self, node: NodeId) -> Option<f64> {
        self.labels.get(&node).map(|label| label.weight)
    }

    /// Record a cheaper way to reach `node`. Returns false if it is not cheaper.
    fn relax(&mut self, node: NodeId, key: f64, label: Label) -> bool {
        if let Some(existing) = self.labels.get(&node)
            && (existing.settled || existing.weight <= label.weight)
        {
            return false;
        }
        self.labels.insert(node, label);
        self.heap.push(Reverse((OrderedFloat(key), node)));
        true
    }

    fn parent(&self, node: NodeId) -> Option<(NodeId, EdgeState)> {
        self.labels.get(&node).and_then(|label| label.parent)
    }
}

/// Point-to-point search whose termination is chosen by `P`.
pub struct BidirectionalSearch<'a, G, A, P> {
    graph: &'a G,
    context: &'a TimeDependentContext,
    approximator: A,
    policy: P,
}

/// Bidirectional A* that is safe around conditionally accessible edges.
pub type ConditionalAStarBidirection<'a, G, A> = BidirectionalSearch<'a, G, A, ConditionalStopping>;

impl<'a, G, A> BidirectionalSearch<'a, G, A, ConditionalStopping>
where
    G: RoutingGraph,
    A: WeightApproximator,
{
    pub fn conditional(graph: &'a G, context: &'a TimeDependentContext, approximator: A) -> Self {
        Self::new(graph, context, approximator, ConditionalStopping)
    }
}

impl<'a, G, A> BidirectionalSearch<'a, G, A, StandardStopping>
where
    G: RoutingGraph,
    A: WeightApproximator,
{
    pub fn standard(graph: &'a G, context: &'a TimeDependentContext, approximator: A) -> Self {
        Self::new(graph, context, approximator, StandardStopping)
    }
}

impl<'a, G, A, P> BidirectionalSearch<'a, G, A, P>
where
    G: RoutingGraph,
    A: WeightApproximator,
    P: StoppingPolicy,
{
    pub fn new(graph: &'a G, context: &'a TimeDependentContext, approximator: A, policy: P) -> Self {
        Self {
            graph,
            context,
            approximator,
            policy,
        }
    }

    pub fn name(&self) -> &'static str {
        self.policy.name()
    }

    /// Fastest path from `source` to `target` leaving at `departure`.
    ///
    /// A missing connection is a `Path` with `found == false`, not an error.
    pub fn calc_path(
        &self,
        source: NodeId,
        target: NodeId,
        departure: DateTime<Utc>,
    ) -> Result<Path, RoutingError> {
        for node in [source, target] {
            if node >= self.graph.node_count() {
                return Err(RoutingError::UnknownNode(node));
            }
        }

        let config = self.context.config();
        let capacity = self.policy.capacity(config.requested_capacity);
        let mut run = Run {
            graph: self.graph,
            approximator: &self.approximator,
            policy: &self.policy,
            filter: self.context.access_filter(),
            weighting: self.context.weighting(),
            source,
            target,
            from: Frontier::new(capacity),
            to: Frontier::new(capacity),
            best: f64::INFINITY,
            meeting: None,
            target_potential: 0.0,
            backward_blocked: false,
        };
        run.init(departure);

        while !run.finished() && run.visited() <= config.max_visited_nodes {
            if !run.from.finished {
                run.from.finished = !run.fill_edges_from()?;
            }
            if !run.to.finished {
                run.to.finished = !run.fill_edges_to()?;
            }
        }

        let mut path = match run.steps() {
            Some(steps) => {
                Path::from_steps(source, &steps, departure, &run.weighting, self.name())?
            }
            None => Path::not_found(departure, self.name()),
        };
        path.visited_from = run.from.visited;
        path.visited_to = run.to.visited;
        path.limit_reached = run.visited() > config.max_visited_nodes;

        debug!(
            algorithm = self.name(),
            source,
            target,
            found = path.found,
            weight = path.weight,
            visited_from = path.visited_from,
            visited_to = path.visited_to,
            backward_blocked = run.backward_blocked,
            limit_reached = path.limit_reached,
            "Search finished"
        );
        Ok(path)
    }
}

/// State of a single `calc_path` call.
struct Run<'s, G, A, P> {
    graph: &'s G,
    approximator: &'s A,
    policy: &'s P,
    filter: ConditionalAccessFilter<'s>,
    weighting: TimeDependentWeighting<'s>,
    source: NodeId,
    target: NodeId,
    from: Frontier,
    to: Frontier,
    best: f64,
    meeting: Option<NodeId>,
    target_potential: f64,
    backward_blocked: bool,
}

impl<G, A, P> Run<'_, G, A, P>
where
    G: RoutingGraph,
    A: WeightApproximator,
    P: StoppingPolicy,
{
    fn init(&mut self, departure: DateTime<Utc>) {
        self.target_potential = self.potential(self.target);
        let source_key = self.potential(self.source);
        self.from.seed(self.source, source_key, Some(departure));
        self.to.seed(self.target, -self.target_potential, None);

        if self.source == self.target {
            self.best = 0.0;
            self.meeting = Some(self.source);
        }
    }

    /// Balanced forward potential. The backward potential is its negation.
    fn potential(&self, node: NodeId) -> f64 {
        let to_target = self.approximator.approximate(node, self.target);
        let from_source = self.approximator.approximate(self.source, node);
        (to_target - from_source) / 2.0
    }

    fn visited(&self) -> usize {
        self.from.visited + self.to.visited
    }

    fn finished(&self) -> bool {
        self.policy.finished(&Progress {
            finished_from: self.from.finished,
            finished_to: self.to.finished,
            from_key: self.from.current_key,
            to_key: self.to.current_key,
            best: self.best,
            target_potential: self.target_potential,
            backward_blocked: self.backward_blocked,
        })
    }

    /// Expand the next forward node. Returns false when the frontier is empty.
    fn fill_edges_from(&mut self) -> Result<bool, RoutingError> {
        let Some((node, label)) = self.from.settle_next() else {
            return Ok(false);
        };
        let Some(at) = label.arrival else {
            return Ok(true);
        };

        let graph = self.graph;
        for edge in graph.edges(node) {
            let adj = edge.adj;
            if self.from.is_settled(adj) {
                continue;
            }
            if !(edge.access(false) || edge.conditional_access(false)) {
                continue;
            }
            if !self.filter.accept(edge, false, at)? {
                continue;
            }
            let edge_weight = self.weighting.weight(edge, false, Some(at))?;
            if !edge_weight.is_finite() {
                continue;
            }

            let millis = self.weighting.calc_millis(edge, false, Some(at))?;
            let weight = label.weight + edge_weight;
            let next = Label {
                weight,
                arrival: Some(advance(at, millis)),
                parent: Some((node, *edge)),
                settled: false,
            };
            if self.from.relax(adj, weight + self.potential(adj), next) {
                self.update_best(adj);
            }
        }
        Ok(true)
    }

    /// Expand the next backward node. Returns false when the frontier is empty.
    fn fill_edges_to(&mut self) -> Result<bool, RoutingError> {
        let Some((node, label)) = self.to.settle_next() else {
            return Ok(false);
        };

        if !self.backward_blocked && self.policy.blocks_backward_stop(self.graph, node) {
            debug!(node, "Backward frontier reached a time-dependent edge");
            self.backward_blocked = true;
        }

        // Seen from `node`, travel towards it runs against the edge.
        let graph = self.graph;
        for edge in graph.edges(node) {
            let adj = edge.adj;
            if self.to.is_settled(adj) {
                continue;
            }
            if !edge.access(true) || is_time_dependent(edge) {
                continue;
            }
            let edge_weight = self.weighting.weight(edge, true, None)?;
            if !edge_weight.is_finite() {
                continue;
            }

            let weight = label.weight + edge_weight;
            let next = Label {
                weight,
                arrival: None,
                parent: Some((node, *edge)),
                settled: false,
            };
            if self.to.relax(adj, weight - self.potential(adj), next) {
                self.update_best(adj);
            }
        }
        Ok(true)
    }

    fn update_best(&mut self, node: NodeId) {
        if let (Some(forward), Some(backward)) = (self.from.weight(node), self.to.weight(node)) {
            let candidate = forward + backward;
            if candidate < self.best {
                self.best = candidate;
                self.meeting = Some(node);
            }
        }
    }

    /// Edges from source to target through the best meeting node.
    fn steps(&self) -> Option<Vec<Step>> {
        let meeting = self.meeting?;

        let mut steps = Vec::new();
        let mut node = meeting;
        while let Some((parent, edge)) = self.from.parent(node) {
            steps.push(Step {
                edge,
                reverse: false,
            });
            node = parent;
        }
        steps.reverse();

        node = meeting;
        while let Some((parent, edge)) = self.to.parent(node) {
            steps.push(Step {
                edge,
                reverse: true,
            });
            node = parent;
        }
        Some(steps)
    }
}
