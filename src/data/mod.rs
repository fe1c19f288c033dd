pub mod supply;

pub use supply::{DataSupply, Order, SetKind};
