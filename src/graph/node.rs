use rand::prelude::*;
use std::collections::HashMap;

/// Maximum fan-in/fan-out of a single node.
///
/// Completion detection uses a fixed-width `u128` bitmask, one bit per
/// neighbor, so no node may have more than 128 neighbors on a side. The
/// topology layer enforces this as a construction error.
pub const MAX_FAN: usize = 128;

/// Stable handle to a node in a [`NeuronGraph`].
///
/// Handles index an arena and are never recycled: a released node leaves a
/// permanently vacant slot behind, so a stale id held in some weight map can
/// never alias a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Direction of a neighbor relationship, from the owning node's viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Upstream,
    Downstream,
}

impl Side {
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Upstream => 0,
            Side::Downstream => 1,
        }
    }
}

/// State record for one trainable node.
///
/// A single record backs both propagation capabilities: the forward pass
/// reads and writes `value`, the backward pass reads and writes `delta` and
/// the weight map, and both share the per-side neighbor lists and reporting
/// bitmasks.
#[derive(Debug, Clone, Default)]
pub struct Neuron {
    /// Post-activation scalar for the forward pass.
    pub(crate) value: f64,
    /// Gradient scalar, recomputed every backward cycle.
    pub(crate) delta: f64,
    /// Neighbor ids per side, fixed between rewiring calls.
    pub(crate) neighbors: [Vec<NodeId>; 2],
    /// One bit per neighbor that has reported this cycle.
    pub(crate) reporting: [u128; 2],
    /// `2^len − 1` for the side's neighbor count; the "all reported" value.
    pub(crate) reference: [u128; 2],
    /// Weight per upstream neighbor, owned by the node that reads it in its
    /// weighted sum.
    pub(crate) weights: HashMap<NodeId, f64>,
}

impl Neuron {
    pub fn new() -> Neuron {
        Neuron::default()
    }
}

/// Arena of nodes plus the per-network rate configuration.
///
/// All propagation happens through methods on the graph: nodes refer to each
/// other by [`NodeId`], never by reference, so the recursive signal cascade
/// needs only one `&mut` borrow of the arena.
#[derive(Debug)]
pub struct NeuronGraph {
    nodes: Vec<Option<Neuron>>,
    learning_rate: f64,
    update_rate: f64,
}

const DEFAULT_RATE: f64 = 0.05;

impl Default for NeuronGraph {
    fn default() -> NeuronGraph {
        NeuronGraph {
            nodes: Vec::new(),
            learning_rate: DEFAULT_RATE,
            update_rate: DEFAULT_RATE,
        }
    }
}

impl NeuronGraph {
    pub fn new() -> NeuronGraph {
        NeuronGraph::default()
    }

    /// Places a node in the arena and returns its permanent handle.
    pub fn insert(&mut self, neuron: Neuron) -> NodeId {
        self.nodes.push(Some(neuron));
        NodeId(self.nodes.len() - 1)
    }

    /// Discards a node. Its slot stays vacant; the id is never reused.
    pub fn release(&mut self, node: NodeId) {
        self.nodes[node.0] = None;
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).map_or(false, Option::is_some)
    }

    pub fn value(&self, node: NodeId) -> f64 {
        self.node(node).value
    }

    pub fn delta(&self, node: NodeId) -> f64 {
        self.node(node).delta
    }

    pub fn neighbors(&self, node: NodeId, side: Side) -> &[NodeId] {
        &self.node(node).neighbors[side.index()]
    }

    /// The configurable shared learning-rate knob.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, rate: f64) {
        self.learning_rate = rate;
    }

    /// The rate the backward pass actually applies when adjusting weights.
    /// Deliberately a separate knob from [`learning_rate`](Self::learning_rate).
    pub fn update_rate(&self) -> f64 {
        self.update_rate
    }

    pub fn set_update_rate(&mut self, rate: f64) {
        self.update_rate = rate;
    }

    /// Replaces a node's neighbor list for one side.
    ///
    /// Clears the side's reporting bitmask, recomputes the reference value,
    /// and runs the new-neighbor hook for every listed node. Neighbor bit
    /// indices are assigned here, in list order, and stay valid until the
    /// next `reset_neighbors` call on the same side.
    pub fn reset_neighbors(&mut self, node: NodeId, neighbors: &[NodeId], side: Side) {
        assert!(
            neighbors.len() <= MAX_FAN,
            "a node may have at most {MAX_FAN} neighbors per side"
        );
        let mut rng = rand::thread_rng();
        let record = self.node_mut(node);
        record.neighbors[side.index()] = neighbors.to_vec();
        record.reporting[side.index()] = 0;
        record.reference[side.index()] = full_mask(neighbors.len());
        if side == Side::Upstream {
            // The whole side is re-registered, so every edge gets a fresh
            // weight and stale keys from earlier wirings are dropped.
            record.weights.clear();
        }
        for &neighbor in neighbors {
            process_new_neighbor(record, neighbor, side, &mut rng);
        }
    }

    /// Registers that `from` has reported on the given side.
    ///
    /// Sets the bit at `from`'s registration index and returns true exactly
    /// once per cycle: when the bitmask reaches the reference value, at which
    /// point it is atomically cleared for the next cycle.
    ///
    /// # Panics
    /// Panics if `from` is not a registered neighbor on that side; that is a
    /// programming error in the wiring, not a runtime condition.
    pub fn check_in(&mut self, node: NodeId, from: NodeId, side: Side) -> bool {
        let record = self.node_mut(node);
        let index = record.neighbors[side.index()]
            .iter()
            .position(|&n| n == from)
            .unwrap_or_else(|| panic!("check_in from {from:?}: not a {side:?} neighbor"));
        record.reporting[side.index()] |= 1 << index;
        if record.reporting[side.index()] == record.reference[side.index()] {
            record.reporting[side.index()] = 0;
            true
        } else {
            false
        }
    }

    /// The weight `node` holds for `upstream`; 0.0 when no such edge exists.
    pub fn get_weight(&self, node: NodeId, upstream: NodeId) -> f64 {
        self.node(node).weights.get(&upstream).copied().unwrap_or(0.0)
    }

    /// Adds `adjustment` to the weight `node` holds for `upstream`.
    pub fn adjust_weight(&mut self, node: NodeId, upstream: NodeId, adjustment: f64) {
        *self.node_mut(node).weights.entry(upstream).or_insert(0.0) += adjustment;
    }

    pub(crate) fn node(&self, node: NodeId) -> &Neuron {
        match self.nodes[node.0].as_ref() {
            Some(record) => record,
            None => panic!("stale node id {node:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> &mut Neuron {
        match self.nodes[node.0].as_mut() {
            Some(record) => record,
            None => panic!("stale node id {node:?}"),
        }
    }
}

/// Hook run once per neighbor added by `reset_neighbors`: a new upstream
/// edge is seeded with an independent uniform weight in [0, 1); downstream
/// additions have no weight side effect.
fn process_new_neighbor(record: &mut Neuron, neighbor: NodeId, side: Side, rng: &mut ThreadRng) {
    if side == Side::Upstream {
        record.weights.insert(neighbor, rng.gen::<f64>());
    }
}

/// Bitmask with the low `len` bits set.
fn full_mask(len: usize) -> u128 {
    if len == 0 {
        0
    } else {
        u128::MAX >> (128 - len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(count: usize) -> (NeuronGraph, Vec<NodeId>) {
        let mut graph = NeuronGraph::new();
        let ids = (0..count).map(|_| graph.insert(Neuron::new())).collect();
        (graph, ids)
    }

    #[test]
    fn reset_neighbors_sets_reference_value() {
        let (mut graph, ids) = graph_with(4);
        graph.reset_neighbors(ids[0], &ids[1..], Side::Upstream);
        assert_eq!(graph.node(ids[0]).reference[Side::Upstream.index()], 0b111);
        assert_eq!(graph.neighbors(ids[0], Side::Upstream), &ids[1..]);
        // The other side is untouched.
        assert_eq!(graph.node(ids[0]).reference[Side::Downstream.index()], 0);
    }

    #[test]
    fn upstream_reset_seeds_weights_in_unit_interval() {
        let (mut graph, ids) = graph_with(4);
        graph.reset_neighbors(ids[0], &ids[1..], Side::Upstream);
        for &upstream in &ids[1..] {
            let w = graph.get_weight(ids[0], upstream);
            assert!((0.0..1.0).contains(&w), "weight {w} outside [0,1)");
        }
    }

    #[test]
    fn downstream_reset_leaves_weights_alone() {
        let (mut graph, ids) = graph_with(3);
        graph.reset_neighbors(ids[0], &ids[1..], Side::Downstream);
        assert_eq!(graph.get_weight(ids[0], ids[1]), 0.0);
    }

    #[test]
    fn rewiring_purges_stale_weights() {
        let (mut graph, ids) = graph_with(3);
        graph.reset_neighbors(ids[0], &[ids[1]], Side::Upstream);
        assert!((0.0..1.0).contains(&graph.get_weight(ids[0], ids[1])));
        graph.reset_neighbors(ids[0], &[ids[2]], Side::Upstream);
        assert_eq!(graph.get_weight(ids[0], ids[1]), 0.0);
    }

    #[test]
    fn check_in_completes_once_in_any_order() {
        let (mut graph, ids) = graph_with(4);
        graph.reset_neighbors(ids[0], &ids[1..], Side::Upstream);
        // Arbitrary order; only the last check-in completes.
        assert!(!graph.check_in(ids[0], ids[3], Side::Upstream));
        assert!(!graph.check_in(ids[0], ids[1], Side::Upstream));
        assert!(graph.check_in(ids[0], ids[2], Side::Upstream));
        // The mask was consumed, so a fresh cycle starts from zero.
        assert!(!graph.check_in(ids[0], ids[1], Side::Upstream));
    }

    #[test]
    fn duplicate_check_in_does_not_complete() {
        let (mut graph, ids) = graph_with(3);
        graph.reset_neighbors(ids[0], &ids[1..], Side::Downstream);
        assert!(!graph.check_in(ids[0], ids[1], Side::Downstream));
        assert!(!graph.check_in(ids[0], ids[1], Side::Downstream));
        assert!(graph.check_in(ids[0], ids[2], Side::Downstream));
    }

    #[test]
    #[should_panic(expected = "not a Upstream neighbor")]
    fn check_in_from_stranger_panics() {
        let (mut graph, ids) = graph_with(3);
        graph.reset_neighbors(ids[0], &[ids[1]], Side::Upstream);
        graph.check_in(ids[0], ids[2], Side::Upstream);
    }

    #[test]
    fn get_weight_of_unknown_edge_is_zero() {
        let (mut graph, ids) = graph_with(2);
        assert_eq!(graph.get_weight(ids[0], ids[1]), 0.0);
        graph.adjust_weight(ids[0], ids[1], 0.25);
        assert_eq!(graph.get_weight(ids[0], ids[1]), 0.25);
    }

    #[test]
    fn released_ids_are_not_recycled() {
        let (mut graph, ids) = graph_with(2);
        graph.release(ids[0]);
        assert!(!graph.contains(ids[0]));
        let fresh = graph.insert(Neuron::new());
        assert_ne!(fresh, ids[0]);
        assert!(graph.contains(fresh));
    }

    #[test]
    fn rate_knobs_are_independent() {
        let mut graph = NeuronGraph::new();
        assert_eq!(graph.learning_rate(), 0.05);
        assert_eq!(graph.update_rate(), 0.05);
        graph.set_learning_rate(0.2);
        assert_eq!(graph.learning_rate(), 0.2);
        assert_eq!(graph.update_rate(), 0.05);
    }

    #[test]
    fn full_mask_widths() {
        assert_eq!(full_mask(0), 0);
        assert_eq!(full_mask(1), 1);
        assert_eq!(full_mask(3), 0b111);
        assert_eq!(full_mask(128), u128::MAX);
    }
}
