use std::error::Error;

use filament_nn::{evaluate, train_loop, DataSupply, LayerTopology, Order, TrainConfig};

/// Learns sin(x) on [0, π/2] from a 10% training split and reports the
/// held-out RMSE.
fn main() -> Result<(), Box<dyn Error>> {
    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut x = 0.0;
    while x <= std::f64::consts::FRAC_PI_2 {
        features.push(vec![x]);
        labels.push(vec![f64::sin(x)]);
        x += 0.01;
    }

    let mut network = LayerTopology::new(1, 1)?;
    network.reset_to_head();
    network.add_layer(3)?;
    network.set_update_rate(0.5);

    let mut data = DataSupply::new(features, labels, 0.1)?;
    println!(
        "training on {} samples, holding out {}",
        data.sample_count(Some(filament_nn::SetKind::Train)),
        data.sample_count(Some(filament_nn::SetKind::Test)),
    );

    for round in 1..=10 {
        let rmse = train_loop(&mut network, &mut data, &TrainConfig::new(1000, Order::Shuffle))?;
        println!("round {round:2}: train RMSE = {rmse:.6}");
    }

    let test_rmse = evaluate(&mut network, &mut data)?;
    println!("held-out RMSE: {test_rmse:.6}");
    Ok(())
}
