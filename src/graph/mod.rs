pub mod node;
pub mod forward;
pub mod backward;
pub mod full;

pub use node::{NeuronGraph, Neuron, NodeId, Side};
pub use forward::ForwardPass;
pub use backward::BackwardPass;
pub use full::Trainable;
