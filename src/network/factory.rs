use crate::graph::node::Neuron;

/// Strategy for producing the nodes a topology is built from, injected at
/// construction instead of being baked into the topology type.
pub trait NodeFactory {
    fn build(&mut self) -> Neuron;
}

/// Default factory: plain trainable nodes with zeroed state.
#[derive(Debug, Default)]
pub struct FullNodeFactory;

impl NodeFactory for FullNodeFactory {
    fn build(&mut self) -> Neuron {
        Neuron::new()
    }
}
