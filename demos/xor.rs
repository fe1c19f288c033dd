use std::error::Error;
use std::sync::mpsc;

use filament_nn::{train_loop, DataSupply, LayerTopology, Order, TrainConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let mut network = LayerTopology::new(2, 1)?;
    network.reset_to_head();
    network.add_layer(3)?;
    network.set_update_rate(0.5);

    let features = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let labels = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];
    let mut data = DataSupply::new(features.clone(), labels, 1.0)?;

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(20_000, Order::Shuffle);
    config.progress_tx = Some(tx);

    let final_rmse = train_loop(&mut network, &mut data, &config)?;

    // Progress as JSON lines, one per thousandth epoch.
    for stats in rx.try_iter().filter(|s| s.epoch % 1000 == 0) {
        println!("{}", serde_json::to_string(&stats)?);
    }
    println!("final train RMSE: {final_rmse:.6}");

    for sample in &features {
        network.feed_forward(sample)?;
        println!(
            "{:?} -> {:.4}",
            sample,
            network.output_values()[0]
        );
    }
    Ok(())
}
