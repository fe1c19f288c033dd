use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::data::supply::Order;
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`      — total number of full passes over the training pool
/// - `order`       — presentation order each epoch (`Shuffle` or `Static`)
/// - `progress_tx` — optional channel sender; one `EpochStats` is sent per
///                   completed epoch. If the receiver is dropped the loop
///                   terminates early (clean shutdown).
/// - `stop_flag`   — optional atomic flag; when set to `true` from another
///                   thread the loop terminates after the current epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub order: Order,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(epochs: usize, order: Order) -> TrainConfig {
        TrainConfig {
            epochs,
            order,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
