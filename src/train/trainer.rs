use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::data::supply::{DataSupply, Order, SetKind};
use crate::error::NetError;
use crate::metrics::rmse::{Euclidean, Rmse};
use crate::network::topology::LayerTopology;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `topology` for `config.epochs` epochs over the train pool and
/// returns the Euclidean RMSE of the **last completed epoch**.
///
/// Each presentation runs one full forward pass, captures the output values,
/// then runs one full backward pass, strictly in sequence: the whole network
/// is shared mutable state between presentations.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    topology: &mut LayerTopology,
    data: &mut DataSupply,
    config: &TrainConfig,
) -> Result<f64, NetError> {
    let mut last_rmse = 0.0;

    for epoch in 1..=config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let t_start = Instant::now();
        let mut rmse = Rmse::new(Euclidean);

        data.prime(Some(SetKind::Train), config.order);
        while let Some((features, labels)) = data.next_item(SetKind::Train) {
            topology.feed_forward(features)?;
            let outputs = topology.output_values();
            topology.back_propagate(labels)?;
            rmse.record(&outputs, labels);
        }

        last_rmse = rmse.current_error();
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_rmse: last_rmse,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if let Some(ref tx) = config.progress_tx {
            // A dropped receiver means nobody is watching; stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_rmse)
}

/// Runs the test pool forward-only and returns its Euclidean RMSE.
/// Weights are never touched.
pub fn evaluate(topology: &mut LayerTopology, data: &mut DataSupply) -> Result<f64, NetError> {
    let mut rmse = Rmse::new(Euclidean);
    data.prime(Some(SetKind::Test), Order::Static);
    while let Some((features, labels)) = data.next_item(SetKind::Test) {
        topology.feed_forward(features)?;
        let outputs = topology.output_values();
        rmse.record(&outputs, labels);
    }
    Ok(rmse.current_error())
}
