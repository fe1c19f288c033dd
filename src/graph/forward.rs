use crate::graph::node::{NeuronGraph, NodeId, Side};

/// Forward-propagation capability.
///
/// A forward pass is a bounded recursive call tree rooted at each
/// [`set_input`](ForwardPass::set_input) call: once every input node has been
/// presented, every node in the network holds its propagated value. Sibling
/// call order never matters, because completion detection is index-based.
pub trait ForwardPass {
    /// Assigns an input node's value directly (input nodes have no upstream,
    /// so the check-in protocol is bypassed) and unconditionally fires to
    /// every downstream neighbor.
    fn set_input(&mut self, node: NodeId, value: f64);

    /// Signal from an upstream neighbor that its value is ready. When the
    /// last upstream neighbor reports, the node computes its own activation
    /// and fires downstream in turn.
    fn data_ready_upstream(&mut self, node: NodeId, source: NodeId);
}

/// Logistic sigmoid, σ(x) = 1 / (1 + e^−x).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl ForwardPass for NeuronGraph {
    fn set_input(&mut self, node: NodeId, value: f64) {
        self.node_mut(node).value = value;
        self.fire_downstream(node);
    }

    fn data_ready_upstream(&mut self, node: NodeId, source: NodeId) {
        if self.check_in(node, source, Side::Upstream) {
            self.calculate_value(node);
            self.fire_downstream(node);
        }
    }
}

impl NeuronGraph {
    /// value = σ(Σ weight(u) · value(u)) over the upstream neighbors.
    fn calculate_value(&mut self, node: NodeId) {
        let weighted_sum: f64 = self
            .neighbors(node, Side::Upstream)
            .iter()
            .map(|&upstream| self.get_weight(node, upstream) * self.value(upstream))
            .sum();
        self.node_mut(node).value = sigmoid(weighted_sum);
    }

    fn fire_downstream(&mut self, node: NodeId) {
        let targets = self.neighbors(node, Side::Downstream).to_vec();
        for target in targets {
            self.data_ready_upstream(target, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::Neuron;

    /// Wires `inputs` × `outputs` fully bipartite and returns the id layers.
    fn bipartite(graph: &mut NeuronGraph, inputs: usize, outputs: usize) -> (Vec<NodeId>, Vec<NodeId>) {
        let input_ids: Vec<NodeId> = (0..inputs).map(|_| graph.insert(Neuron::new())).collect();
        let output_ids: Vec<NodeId> = (0..outputs).map(|_| graph.insert(Neuron::new())).collect();
        for &i in &input_ids {
            graph.reset_neighbors(i, &output_ids, Side::Downstream);
        }
        for &o in &output_ids {
            graph.reset_neighbors(o, &input_ids, Side::Upstream);
        }
        (input_ids, output_ids)
    }

    #[test]
    fn sigmoid_reference_points() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(1.0) - 0.731_058_578_630_004_9).abs() < 1e-12);
        assert!((sigmoid(-1.0) - (1.0 - sigmoid(1.0))).abs() < 1e-12);
    }

    #[test]
    fn single_edge_propagates_weighted_sigmoid() {
        let mut graph = NeuronGraph::new();
        let (inputs, outputs) = bipartite(&mut graph, 1, 1);
        let w = graph.get_weight(outputs[0], inputs[0]);

        graph.set_input(inputs[0], 0.8);

        let expected = sigmoid(w * 0.8);
        assert!((graph.value(outputs[0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn input_order_does_not_change_outputs() {
        let mut graph = NeuronGraph::new();
        let (inputs, outputs) = bipartite(&mut graph, 3, 2);
        let sample = [0.25, -0.5, 0.75];

        graph.set_input(inputs[0], sample[0]);
        graph.set_input(inputs[1], sample[1]);
        graph.set_input(inputs[2], sample[2]);
        let first: Vec<f64> = outputs.iter().map(|&o| graph.value(o)).collect();

        // Same presentation, permuted call order.
        graph.set_input(inputs[2], sample[2]);
        graph.set_input(inputs[0], sample[0]);
        graph.set_input(inputs[1], sample[1]);
        let second: Vec<f64> = outputs.iter().map(|&o| graph.value(o)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn repeated_forward_passes_are_idempotent() {
        let mut graph = NeuronGraph::new();
        let (inputs, outputs) = bipartite(&mut graph, 2, 2);

        graph.set_input(inputs[0], 0.3);
        graph.set_input(inputs[1], 0.9);
        let first: Vec<f64> = outputs.iter().map(|&o| graph.value(o)).collect();

        graph.set_input(inputs[0], 0.3);
        graph.set_input(inputs[1], 0.9);
        let second: Vec<f64> = outputs.iter().map(|&o| graph.value(o)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn partial_presentation_leaves_outputs_untouched() {
        let mut graph = NeuronGraph::new();
        let (inputs, outputs) = bipartite(&mut graph, 2, 1);

        graph.set_input(inputs[0], 1.0);
        // Only one of two inputs has reported; the output must not fire.
        assert_eq!(graph.value(outputs[0]), 0.0);

        graph.set_input(inputs[1], 1.0);
        assert!(graph.value(outputs[0]) > 0.0);
    }
}
