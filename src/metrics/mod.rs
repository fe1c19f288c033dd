pub mod rmse;

pub use rmse::{Distance, Euclidean, Rmse, Taxicab};
