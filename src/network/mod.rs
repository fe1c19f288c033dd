pub mod factory;
pub mod topology;

pub use factory::{FullNodeFactory, NodeFactory};
pub use topology::LayerTopology;
