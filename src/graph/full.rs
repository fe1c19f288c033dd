use crate::graph::backward::BackwardPass;
use crate::graph::forward::ForwardPass;

/// Interface union of the two propagation capabilities.
///
/// A trainable graph is one whose nodes can run both the forward and the
/// backward protocol over a single shared state record. There is no extra
/// behavior here; the union exists so drivers can name "forward + backward"
/// as one bound.
pub trait Trainable: ForwardPass + BackwardPass {}

impl<T: ForwardPass + BackwardPass> Trainable for T {}
