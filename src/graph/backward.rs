use crate::graph::node::{NeuronGraph, NodeId, Side};

/// Back-propagation capability.
///
/// A backward pass is rooted at each [`set_expected`](BackwardPass::set_expected)
/// call on an output node and cascades upstream. A node's delta is finalized
/// before it fires, so the weight update may safely run after the deeper
/// recursion returns: for one presentation, the weight on edge (i→j) is
/// adjusted exactly once, by node i, using node j's finalized delta and node
/// i's finalized forward value.
pub trait BackwardPass {
    /// Seeds the cycle at an output node: delta = (target − v)·v·(1 − v),
    /// then fires to every upstream neighbor. No check-in is involved.
    fn set_expected(&mut self, node: NodeId, target: f64);

    /// Signal from a downstream neighbor that its delta is ready. When the
    /// last downstream neighbor reports, the node computes its own delta,
    /// fires upstream, and then adjusts its downstream neighbors' weights.
    fn data_ready_downstream(&mut self, node: NodeId, source: NodeId);
}

/// Derivative of the logistic sigmoid expressed in terms of its output:
/// σ'(x) = σ(x)·(1 − σ(x)), so the post-activation value is all we need.
pub fn sigmoid_derivative(value: f64) -> f64 {
    value * (1.0 - value)
}

impl BackwardPass for NeuronGraph {
    fn set_expected(&mut self, node: NodeId, target: f64) {
        let value = self.value(node);
        self.node_mut(node).delta = (target - value) * sigmoid_derivative(value);
        self.fire_upstream(node);
    }

    fn data_ready_downstream(&mut self, node: NodeId, source: NodeId) {
        if self.check_in(node, source, Side::Downstream) {
            self.calculate_delta(node);
            self.fire_upstream(node);
            self.update_weights(node);
        }
    }
}

impl NeuronGraph {
    /// delta = v·(1 − v)·Σ delta(d)·weight(d→self) over downstream neighbors,
    /// where weight(d→self) is the weight d holds for this node.
    fn calculate_delta(&mut self, node: NodeId) {
        let weighted_sum: f64 = self
            .neighbors(node, Side::Downstream)
            .iter()
            .map(|&downstream| self.delta(downstream) * self.get_weight(downstream, node))
            .sum();
        let value = self.value(node);
        self.node_mut(node).delta = sigmoid_derivative(value) * weighted_sum;
    }

    fn fire_upstream(&mut self, node: NodeId) {
        let targets = self.neighbors(node, Side::Upstream).to_vec();
        for target in targets {
            self.data_ready_downstream(target, node);
        }
    }

    /// Instructs each downstream neighbor to nudge the weight it holds for
    /// this node by update_rate · delta(d) · value(self).
    fn update_weights(&mut self, node: NodeId) {
        let rate = self.update_rate();
        let value = self.value(node);
        let targets = self.neighbors(node, Side::Downstream).to_vec();
        for downstream in targets {
            let adjustment = rate * self.delta(downstream) * value;
            self.adjust_weight(downstream, node, adjustment);
        }
    }
}
