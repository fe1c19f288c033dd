use crate::error::NetError;
use crate::graph::backward::BackwardPass;
use crate::graph::forward::ForwardPass;
use crate::graph::node::{NeuronGraph, NodeId, Side, MAX_FAN};
use crate::list::bidirectional::BidirectionalList;
use crate::network::factory::{FullNodeFactory, NodeFactory};

/// A layered, fully-connected network: a cursor-based list of layers (each an
/// ordered sequence of node ids) over a [`NeuronGraph`] arena.
///
/// The topology always holds at least two layers (input at the head, output
/// at the tail) and keeps every adjacent layer pair fully bipartite-wired:
/// the dense assumption the nodes' bitmask protocol relies on. The list is
/// consulted only at construction and structural-edit time; propagation runs
/// entirely through the graph.
pub struct LayerTopology {
    graph: NeuronGraph,
    layers: BidirectionalList<Vec<NodeId>>,
    factory: Box<dyn NodeFactory>,
}

impl std::fmt::Debug for LayerTopology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerTopology")
            .field("graph", &self.graph)
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

impl LayerTopology {
    /// Builds an input/output two-layer network from the default factory.
    pub fn new(num_inputs: usize, num_outputs: usize) -> Result<LayerTopology, NetError> {
        LayerTopology::with_factory(num_inputs, num_outputs, Box::new(FullNodeFactory))
    }

    /// Builds an input/output two-layer network, producing every node through
    /// `factory`, and wires the two layers fully bipartite.
    pub fn with_factory(
        num_inputs: usize,
        num_outputs: usize,
        factory: Box<dyn NodeFactory>,
    ) -> Result<LayerTopology, NetError> {
        if num_inputs < 1 || num_outputs < 1 {
            return Err(NetError::Construction(
                "a network needs at least one input and one output node",
            ));
        }
        check_layer_size(num_inputs)?;
        check_layer_size(num_outputs)?;

        let mut topology = LayerTopology {
            graph: NeuronGraph::new(),
            layers: BidirectionalList::new(),
            factory,
        };
        let input_layer = topology.make_layer(num_inputs);
        let output_layer = topology.make_layer(num_outputs);
        topology.layers.add_to_head(input_layer);
        topology.layers.add_after_current(output_layer)?;
        topology.link_with_next()?;
        Ok(topology)
    }

    /// Inserts a hidden layer of `size` nodes after the cursor layer and
    /// rewires both seams.
    ///
    /// Fails with [`NetError::Topology`] when the cursor sits on the output
    /// layer (there is no room to insert after it) and with
    /// [`NetError::Construction`] when `size` exceeds the fan cap. Validation
    /// happens before any mutation.
    pub fn add_layer(&mut self, size: usize) -> Result<(), NetError> {
        if self.layers.cursor_at_tail() || self.layers.is_empty() {
            return Err(NetError::Topology(
                "cannot insert a layer after the output layer",
            ));
        }
        check_layer_size(size)?;

        let hidden = self.make_layer(size);
        self.layers.add_after_current(hidden)?;
        // Each wiring call only connects the cursor layer to its immediate
        // next layer, so the far seam needs a step forward and back.
        self.link_with_next()?;
        self.layers.move_forward()?;
        self.link_with_next()?;
        self.layers.move_backward()?;
        Ok(())
    }

    /// Removes the layer after the cursor, releases its nodes, and rewires
    /// the cursor layer directly to the layer that followed.
    ///
    /// Fails with [`NetError::Topology`] when no layer follows the cursor or
    /// the next layer is the output layer; input and output layers can never
    /// be removed.
    pub fn remove_layer(&mut self) -> Result<(), NetError> {
        if self.layers.peek_next().is_none() || self.layers.next_is_tail() {
            return Err(NetError::Topology(
                "only hidden layers can be removed",
            ));
        }
        let removed = self.layers.remove_after_current()?;
        for node in removed {
            self.graph.release(node);
        }
        self.link_with_next()
    }

    /// Node ids of the input (head) layer, in presentation order.
    pub fn input_nodes(&self) -> &[NodeId] {
        self.layers.head_value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Node ids of the output (tail) layer, in presentation order.
    pub fn output_nodes(&self) -> &[NodeId] {
        self.layers.tail_value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    // ── Cursor navigation (structural edits are cursor-relative) ──────────

    pub fn reset_to_head(&mut self) {
        self.layers.reset_to_head();
    }

    pub fn reset_to_tail(&mut self) {
        self.layers.reset_to_tail();
    }

    pub fn move_forward(&mut self) -> Result<(), NetError> {
        self.layers.move_forward()
    }

    pub fn move_backward(&mut self) -> Result<(), NetError> {
        self.layers.move_backward()
    }

    // ── Training surface ──────────────────────────────────────────────────

    /// Presents one sample: one `set_input` per input node, in input order.
    /// The forward cascade completes before this returns.
    pub fn feed_forward(&mut self, sample: &[f64]) -> Result<(), NetError> {
        let inputs = self.input_nodes().to_vec();
        if sample.len() != inputs.len() {
            return Err(NetError::Construction(
                "sample length must match the input layer",
            ));
        }
        for (node, &value) in inputs.into_iter().zip(sample) {
            self.graph.set_input(node, value);
        }
        Ok(())
    }

    /// Presents one expected vector: one `set_expected` per output node, in
    /// output order. The backward cascade (deltas and weight updates)
    /// completes before this returns.
    pub fn back_propagate(&mut self, expected: &[f64]) -> Result<(), NetError> {
        let outputs = self.output_nodes().to_vec();
        if expected.len() != outputs.len() {
            return Err(NetError::Construction(
                "expected length must match the output layer",
            ));
        }
        for (node, &target) in outputs.into_iter().zip(expected) {
            self.graph.set_expected(node, target);
        }
        Ok(())
    }

    /// Current values of the output layer, in output order.
    pub fn output_values(&self) -> Vec<f64> {
        self.output_nodes()
            .iter()
            .map(|&node| self.graph.value(node))
            .collect()
    }

    // ── Rate knobs & inspection ───────────────────────────────────────────

    pub fn learning_rate(&self) -> f64 {
        self.graph.learning_rate()
    }

    pub fn set_learning_rate(&mut self, rate: f64) {
        self.graph.set_learning_rate(rate);
    }

    pub fn update_rate(&self) -> f64 {
        self.graph.update_rate()
    }

    pub fn set_update_rate(&mut self, rate: f64) {
        self.graph.set_update_rate(rate);
    }

    /// Read access to the underlying node arena.
    pub fn graph(&self) -> &NeuronGraph {
        &self.graph
    }

    // ── Internal wiring ───────────────────────────────────────────────────

    fn make_layer(&mut self, size: usize) -> Vec<NodeId> {
        (0..size)
            .map(|_| self.graph.insert(self.factory.build()))
            .collect()
    }

    /// Wires the cursor layer and its immediate next layer fully bipartite:
    /// every cursor-layer node lists every next-layer node downstream, and
    /// vice versa upstream.
    fn link_with_next(&mut self) -> Result<(), NetError> {
        let current = self.layers.current_value()?.clone();
        let next = self
            .layers
            .peek_next()
            .ok_or(NetError::EmptyStructure("no next layer to wire"))?
            .clone();
        for &node in &current {
            self.graph.reset_neighbors(node, &next, Side::Downstream);
        }
        for &node in &next {
            self.graph.reset_neighbors(node, &current, Side::Upstream);
        }
        Ok(())
    }
}

fn check_layer_size(size: usize) -> Result<(), NetError> {
    if size > MAX_FAN {
        return Err(NetError::Construction(
            "layer size exceeds the node fan cap",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::forward::sigmoid;

    #[test]
    fn construction_yields_two_wired_layers() {
        let net = LayerTopology::new(3, 2).unwrap();
        assert_eq!(net.layer_count(), 2);
        assert_eq!(net.input_nodes().len(), 3);
        assert_eq!(net.output_nodes().len(), 2);

        let graph = net.graph();
        for &i in net.input_nodes() {
            assert_eq!(graph.neighbors(i, Side::Downstream), net.output_nodes());
            assert!(graph.neighbors(i, Side::Upstream).is_empty());
        }
        for &o in net.output_nodes() {
            assert_eq!(graph.neighbors(o, Side::Upstream), net.input_nodes());
            assert!(graph.neighbors(o, Side::Downstream).is_empty());
            for &i in net.input_nodes() {
                let w = graph.get_weight(o, i);
                assert!((0.0..1.0).contains(&w), "weight {w} outside [0,1)");
            }
        }
    }

    #[test]
    fn construction_rejects_empty_layers() {
        assert_eq!(
            LayerTopology::new(0, 1).unwrap_err(),
            NetError::Construction("a network needs at least one input and one output node")
        );
        assert!(LayerTopology::new(1, 0).is_err());
        assert!(matches!(
            LayerTopology::new(1, MAX_FAN + 1),
            Err(NetError::Construction(_))
        ));
    }

    #[test]
    fn add_layer_splices_into_both_seams() {
        let mut net = LayerTopology::new(2, 2).unwrap();
        net.reset_to_head();
        net.add_layer(3).unwrap();
        assert_eq!(net.layer_count(), 3);

        let inputs = net.input_nodes().to_vec();
        let outputs = net.output_nodes().to_vec();
        let graph = net.graph();
        let hidden = graph.neighbors(inputs[0], Side::Downstream).to_vec();
        assert_eq!(hidden.len(), 3);
        for &h in &hidden {
            assert_eq!(graph.neighbors(h, Side::Upstream), &inputs[..]);
            assert_eq!(graph.neighbors(h, Side::Downstream), &outputs[..]);
        }
        for &o in &outputs {
            assert_eq!(graph.neighbors(o, Side::Upstream), &hidden[..]);
        }
    }

    #[test]
    fn add_then_remove_restores_adjacency() {
        let mut net = LayerTopology::new(2, 2).unwrap();
        net.reset_to_head();
        net.add_layer(4).unwrap();
        let hidden = net
            .graph()
            .neighbors(net.input_nodes()[0], Side::Downstream)
            .to_vec();
        net.remove_layer().unwrap();

        assert_eq!(net.layer_count(), 2);
        let inputs = net.input_nodes().to_vec();
        let outputs = net.output_nodes().to_vec();
        let graph = net.graph();
        for &i in &inputs {
            assert_eq!(graph.neighbors(i, Side::Downstream), &outputs[..]);
        }
        for &o in &outputs {
            assert_eq!(graph.neighbors(o, Side::Upstream), &inputs[..]);
        }
        // The hidden layer's nodes are gone from the arena for good.
        for h in hidden {
            assert!(!graph.contains(h));
        }
    }

    #[test]
    fn structural_edits_fail_at_boundaries() {
        let mut net = LayerTopology::new(1, 1).unwrap();
        // Only input and output layers exist: nothing is removable.
        net.reset_to_head();
        assert!(matches!(net.remove_layer(), Err(NetError::Topology(_))));
        // Cursor on the output layer: no room to insert after it.
        net.reset_to_tail();
        assert!(matches!(net.add_layer(2), Err(NetError::Topology(_))));
        assert_eq!(net.layer_count(), 2);
    }

    #[test]
    fn rejected_edit_leaves_no_partial_mutation() {
        let mut net = LayerTopology::new(1, 1).unwrap();
        net.reset_to_head();
        assert!(net.add_layer(MAX_FAN + 1).is_err());
        assert_eq!(net.layer_count(), 2);
        let graph = net.graph();
        assert_eq!(
            graph.neighbors(net.input_nodes()[0], Side::Downstream),
            net.output_nodes()
        );
    }

    #[test]
    fn feed_forward_matches_direct_computation() {
        let mut net = LayerTopology::new(1, 1).unwrap();
        let input = net.input_nodes()[0];
        let output = net.output_nodes()[0];
        let w = net.graph().get_weight(output, input);

        net.feed_forward(&[0.8]).unwrap();
        let expected = sigmoid(w * 0.8);
        assert!((net.output_values()[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn back_propagate_applies_exact_update() {
        let mut net = LayerTopology::new(1, 1).unwrap();
        let input = net.input_nodes()[0];
        let output = net.output_nodes()[0];
        let x = 0.8;
        let target = 1.0;
        let w0 = net.graph().get_weight(output, input);

        net.feed_forward(&[x]).unwrap();
        let y = net.output_values()[0];
        net.back_propagate(&[target]).unwrap();

        let delta = (target - y) * y * (1.0 - y);
        let expected_w = w0 + net.update_rate() * delta * x;
        assert!((net.graph().get_weight(output, input) - expected_w).abs() < 1e-12);
    }

    #[test]
    fn forward_only_calls_do_not_accumulate() {
        let mut net = LayerTopology::new(2, 1).unwrap();
        net.reset_to_head();
        net.add_layer(3).unwrap();

        net.feed_forward(&[0.1, 0.9]).unwrap();
        let first = net.output_values();
        net.feed_forward(&[0.1, 0.9]).unwrap();
        assert_eq!(first, net.output_values());
    }

    #[test]
    fn sample_width_is_validated() {
        let mut net = LayerTopology::new(2, 1).unwrap();
        assert!(matches!(
            net.feed_forward(&[1.0]),
            Err(NetError::Construction(_))
        ));
        assert!(matches!(
            net.back_propagate(&[1.0, 0.0]),
            Err(NetError::Construction(_))
        ));
    }

    #[test]
    fn hidden_network_trains_end_to_end() {
        let mut net = LayerTopology::new(2, 1).unwrap();
        net.reset_to_head();
        net.add_layer(3).unwrap();
        net.set_update_rate(0.5);

        // Push the output toward 1.0 for a fixed sample; the squared error
        // must shrink over a handful of presentations.
        net.feed_forward(&[1.0, 0.5]).unwrap();
        let initial = (1.0 - net.output_values()[0]).abs();
        for _ in 0..50 {
            net.feed_forward(&[1.0, 0.5]).unwrap();
            net.back_propagate(&[1.0]).unwrap();
        }
        net.feed_forward(&[1.0, 0.5]).unwrap();
        let trained = (1.0 - net.output_values()[0]).abs();
        assert!(trained < initial);
    }
}
