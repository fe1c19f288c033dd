pub mod trainer;
pub mod epoch_stats;
pub mod train_config;

pub use trainer::{evaluate, train_loop};
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
