use log::{error, info};
use rand::Rng;
use snnet::{Logging, Network, TrainingConfig, TrainingRecord};

/// Samples noisy points on the unit circle, labelled by whether they fall in
/// the first/third or the second/fourth quadrant.
fn generate_data<R: Rng>(rng: &mut R, num_samples: usize) -> Vec<TrainingRecord> {
    let mut data = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let theta: f64 = rng.gen_range(0.0..2.0 * std::f64::consts::PI);
        let dx: f64 = rng.gen_range(-0.1..0.1);
        let dy: f64 = rng.gen_range(-0.1..0.1);
        let point = [theta.cos() + dx, theta.sin() + dy];
        let class = if point[0] * point[1] > 0.0 {
            [1.0, 0.0]
        } else {
            [0.0, 1.0]
        };
        data.push((point, class).into());
    }
    data
}

fn score(set_name: &str, network: &Network, test_data: &[TrainingRecord]) -> snnet::Result<()> {
    let mut num_correct = 0;
    for record in test_data {
        let output = network.run_input(&record.input)?;
        let class = if output[0] > output[1] { 0 } else { 1 };
        if record.output[class] == 1.0 {
            num_correct += 1;
        }
    }
    info!(
        "{} set results: {} of {} correct",
        set_name,
        num_correct,
        test_data.len()
    );
    Ok(())
}

fn run() -> snnet::Result<()> {
    let mut rng = rand::thread_rng();
    let training_data = generate_data(&mut rng, 1_000);
    let config = TrainingConfig::default()
        .learning_rate(0.1)
        .momentum(0.5)
        .max_iterations(500)
        .min_error(5.0)
        .logging(Logging::Iterations(50));
    let mut network = Network::with_hidden_layers(2, &[5, 5], 2)?.with_config(config);
    network.train(&training_data)?;

    score("Training", &network, &training_data)?;
    score("Test", &network, &generate_data(&mut rng, 1_000))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
