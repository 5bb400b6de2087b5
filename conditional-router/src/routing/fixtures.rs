//! Contexts and edges for routing tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::conditional::fake::FakeGrammar;
use crate::config::RoutingConfig;
use crate::domain::Rule;
use crate::graph::{DirectionFlags, EdgeId, EdgeState, NodeId};
use crate::storage::{DedupValueStore, StoreConfig};

use super::context::{
    CONDITIONAL_ACCESS_STORE, CONDITIONAL_SPEED_STORE, TIMEZONE_STORE, TimeDependentContext,
};

pub(crate) fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// A 100 m edge open both ways at 50 km/h.
pub(crate) fn edge_from(base: NodeId, adj: NodeId, edge: EdgeId) -> EdgeState {
    EdgeState {
        edge,
        original_edge: edge,
        base,
        adj,
        distance: 100.0,
        forward: DirectionFlags::open(50.0),
        backward: DirectionFlags::open(50.0),
        is_virtual: false,
        unfavored: false,
    }
}

/// Like [`edge_from`], with a conditional access tag on `base -> adj`.
pub(crate) fn conditional_edge(base: NodeId, adj: NodeId, edge: EdgeId) -> EdgeState {
    let mut state = edge_from(base, adj, edge);
    state.forward.conditional_access = true;
    state
}

/// Builds a [`TimeDependentContext`] held entirely in memory.
pub(crate) struct ContextBuilder {
    grammar: FakeGrammar,
    access: Vec<(usize, String)>,
    speed: Vec<(usize, String)>,
    zones: Vec<(usize, String)>,
    config: RoutingConfig,
}

impl ContextBuilder {
    pub(crate) fn new() -> Self {
        Self {
            grammar: FakeGrammar::new(),
            access: Vec::new(),
            speed: Vec::new(),
            zones: Vec::new(),
            config: RoutingConfig::default(),
        }
    }

    pub(crate) fn timezone(mut self, node: NodeId, zone: &str) -> Self {
        self.zones.push((node, zone.to_string()));
        self
    }

    pub(crate) fn rules(mut self, text: &str, rules: Vec<Rule>) -> Self {
        self.grammar = self.grammar.rules(text, rules);
        self
    }

    /// Store `raw` as the access tag of `edge` and teach the grammar its clauses.
    pub(crate) fn access(mut self, edge: EdgeId, raw: &str, clauses: Vec<(&str, Vec<&str>)>) -> Self {
        self.grammar = self.grammar.clauses(raw, clauses);
        self.access_text(edge, raw)
    }

    /// Store `raw` without teaching the grammar, so it fails to parse.
    pub(crate) fn access_text(mut self, edge: EdgeId, raw: &str) -> Self {
        self.access.push((edge, raw.to_string()));
        self
    }

    pub(crate) fn speed(mut self, edge: EdgeId, raw: &str, clauses: Vec<(&str, Vec<&str>)>) -> Self {
        self.grammar = self.grammar.clauses(raw, clauses);
        self.speed.push((edge, raw.to_string()));
        self
    }

    pub(crate) fn config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn build(self) -> TimeDependentContext {
        self.build_with_grammar().1
    }

    pub(crate) fn build_with_grammar(self) -> (Arc<FakeGrammar>, TimeDependentContext) {
        let (grammar, cache) = self.grammar.into_cache();
        let context = TimeDependentContext::new(
            store(CONDITIONAL_ACCESS_STORE, &self.access),
            store(CONDITIONAL_SPEED_STORE, &self.speed),
            store(TIMEZONE_STORE, &self.zones),
            cache,
            self.config,
        );
        (grammar, context)
    }
}

fn store(name: &str, values: &[(usize, String)]) -> DedupValueStore {
    let mut store = DedupValueStore::new(StoreConfig::new("unused", name));
    store.create(values.len()).unwrap();
    for (owner, value) in values {
        store.set_value(*owner, value).unwrap();
    }
    store
}
