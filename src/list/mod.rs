pub mod bidirectional;

pub use bidirectional::BidirectionalList;
