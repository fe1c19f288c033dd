pub mod error;
pub mod list;
pub mod graph;
pub mod network;
pub mod data;
pub mod metrics;
pub mod train;

// Convenience re-exports
pub use error::NetError;
pub use list::bidirectional::BidirectionalList;
pub use graph::node::{NeuronGraph, Neuron, NodeId, Side};
pub use graph::forward::ForwardPass;
pub use graph::backward::BackwardPass;
pub use graph::full::Trainable;
pub use network::topology::LayerTopology;
pub use network::factory::{NodeFactory, FullNodeFactory};
pub use data::supply::{DataSupply, Order, SetKind};
pub use metrics::rmse::{Rmse, Distance, Euclidean, Taxicab};
pub use train::trainer::{train_loop, evaluate};
pub use train::train_config::TrainConfig;
pub use train::epoch_stats::EpochStats;
