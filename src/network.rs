//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! # Example
//!
//! Let's train a simple neural network to compute the XOR function:
//!
//! ```
//! # use snnet::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // Create examples of the XOR function
//! let records: Vec<TrainingRecord> = vec![
//!     ([0.0, 0.0], [0.0]).into(),
//!     ([0.0, 1.0], [1.0]).into(),
//!     ([1.0, 0.0], [1.0]).into(),
//!     ([1.0, 1.0], [0.0]).into(),
//! ];
//!
//! // Train a network using those examples
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut network = Network::with_rng(2, &[4], 1, &mut rng)?.with_config(
//!     TrainingConfig::default()
//!         .learning_rate(0.5)
//!         .momentum(0.5)
//!         .min_error(0.01)
//!         .logging(Logging::Silent),
//! );
//! let error = network.train(&records)?;
//! assert!(error <= 0.01);
//!
//! // And verify the network correctly computes XOR!
//! fn classify(out: Vec<f64>) -> bool {
//!     out[0] > 0.5
//! }
//! assert_eq!(classify(network.run_input(&[0.0, 0.0])?), false);
//! assert_eq!(classify(network.run_input(&[0.0, 1.0])?), true);
//! assert_eq!(classify(network.run_input(&[1.0, 0.0])?), true);
//! assert_eq!(classify(network.run_input(&[1.0, 1.0])?), false);
//! # Ok::<(), snnet::Error>(())
//! ```

use crate::config::TrainingConfig;
use crate::error::{check_len, Error, Result};
use crate::layer::Layer;
use crate::record::TrainingRecord;
use crate::trainer::{Trainable, Trainer};

use log::debug;
use ndarray::{Array1, ArrayView1};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

/// Where a network is in its lifecycle.
///
/// A network starts out `Constructed` and moves to `Trained` when its single
/// training run finishes. It never moves back.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum State {
    Constructed,
    Trained {
        /// Passes made over the training set.
        iterations: usize,
        /// Summed squared error of the final pass.
        error: f64,
    },
}

/// A Feedforward neural network
#[derive(Clone, Debug)]
pub struct Network {
    num_inputs: usize,
    num_outputs: usize,
    /// Hidden layers followed by the output layer. Never empty.
    layers: Vec<Layer>,
    config: TrainingConfig,
    state: State,
}

impl Network {
    /// Creates a new, untrained network with a single hidden layer.
    ///
    /// The hidden layer has `max(3, (num_inputs + num_outputs) / 2)` neurons.
    pub fn new(num_inputs: usize, num_outputs: usize) -> Result<Self> {
        let hidden = default_hidden_size(num_inputs, num_outputs);
        Network::with_hidden_layers(num_inputs, &[hidden], num_outputs)
    }

    /// Creates a new, untrained network.
    ///
    /// Arguments:
    ///  * `num_inputs` - the number of inputs to the network.
    ///  * `hidden_layers` - the number of neurons in each hidden layer. May be
    ///                      empty, connecting the inputs directly to the
    ///                      outputs.
    ///  * `num_outputs` - the number of outputs from the network.
    pub fn with_hidden_layers(
        num_inputs: usize,
        hidden_layers: &[usize],
        num_outputs: usize,
    ) -> Result<Self> {
        Network::with_rng(num_inputs, hidden_layers, num_outputs, &mut rand::thread_rng())
    }

    /// Creates a new, untrained network, drawing its initial weights from
    /// `rng`.
    pub fn with_rng<R>(
        num_inputs: usize,
        hidden_layers: &[usize],
        num_outputs: usize,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        check_topology(num_inputs, hidden_layers, num_outputs)?;
        let mut layers = Vec::with_capacity(hidden_layers.len() + 1);
        let mut inputs = num_inputs;
        for &size in hidden_layers.iter().chain(Some(&num_outputs)) {
            layers.push(Layer::new(rng, inputs, size));
            inputs = size;
        }
        debug!(
            "created network {} -> {:?} -> {}",
            num_inputs, hidden_layers, num_outputs
        );
        Ok(Network::from_parts(
            num_inputs,
            num_outputs,
            layers,
            TrainingConfig::default(),
            State::Constructed,
        ))
    }

    /// Creates a network with one default-sized hidden layer and trains it on
    /// `records` using the default configuration.
    ///
    /// The final training error is available from `training_error`.
    pub fn create_and_train(
        records: &[TrainingRecord],
        num_inputs: usize,
        num_outputs: usize,
    ) -> Result<Self> {
        let mut network = Network::new(num_inputs, num_outputs)?;
        network.train(records)?;
        Ok(network)
    }

    pub(crate) fn from_parts(
        num_inputs: usize,
        num_outputs: usize,
        layers: Vec<Layer>,
        config: TrainingConfig,
        state: State,
    ) -> Self {
        debug_assert!(!layers.is_empty());
        Network {
            num_inputs,
            num_outputs,
            layers,
            config,
            state,
        }
    }

    /// Replaces the training configuration.
    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the training configuration. Has no effect on a network that
    /// has already been trained.
    pub fn set_config(&mut self, config: TrainingConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Returns the size of the input layer to the network.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Returns the size of the output layer from the network.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Returns the number of neurons in each hidden layer.
    pub fn hidden_layers(&self) -> Vec<usize> {
        let hidden = &self.layers[..self.layers.len() - 1];
        hidden.iter().map(Layer::output_len).collect()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, State::Trained { .. })
    }

    /// Returns the final error of the training run, if there was one.
    pub fn training_error(&self) -> Option<f64> {
        match self.state {
            State::Trained { error, .. } => Some(error),
            State::Constructed => None,
        }
    }

    pub(crate) fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Trains the network on `records`. A network can only be trained once.
    ///
    /// Each pass over `records` runs every record forward and backward and
    /// updates the weights immediately, in order. Training stops once the
    /// summed squared error of a pass is at most `min_error`, or after
    /// `max_iterations` passes. With `max_iterations` of zero the weights are
    /// left alone and the returned error is that of the untrained network.
    ///
    /// Returns:
    ///   The error of the final pass. Fails with `AlreadyTrained` on a second
    ///   call, or `DimensionMismatch` if any record has the wrong shape; the
    ///   network is left untouched in both cases.
    pub fn train(&mut self, records: &[TrainingRecord]) -> Result<f64> {
        if self.is_trained() {
            return Err(Error::AlreadyTrained);
        }
        let config = self.config;
        let trainer = Trainer::new(&config);
        trainer.validate(&*self, records)?;

        let outcome = trainer.train(self, records);
        self.state = State::Trained {
            iterations: outcome.iterations,
            error: outcome.error,
        };
        Ok(outcome.error)
    }

    /// Feeds the provided `input` through the network, returning the output
    /// layer.
    ///
    /// Inference works in scratch buffers and leaves the per-layer outputs
    /// kept for the backward pass untouched; only training fills those in.
    pub fn run_input(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len(self.num_inputs, input.len())?;
        Ok(self.predict(ArrayView1::from(input)).to_vec())
    }

    fn predict(&self, input: ArrayView1<f64>) -> Array1<f64> {
        let mut activations = input.to_owned();
        for layer in &self.layers {
            let mut outputs = Array1::zeros(layer.output_len());
            layer.activate(activations.view(), outputs.view_mut());
            activations = outputs;
        }
        activations
    }

    /// Feeds `input` through the network, storing the activations of every
    /// layer.
    fn feed_forward(&mut self, input: ArrayView1<f64>) {
        for i in 0..self.layers.len() {
            let (previous, layer, _) = neighbours(&mut self.layers, i);
            match previous {
                Some(previous) => layer.forward(previous.outputs()),
                None => layer.forward(input),
            }
        }
    }

    /// Feeds the provided `expected` value back through the network, storing
    /// the error terms of every layer. Returns the squared output error.
    fn feed_backwards(&mut self, expected: &[f64]) -> f64 {
        let last = self.layers.len() - 1;
        let error = self.layers[last].output_deltas(expected);
        for i in (0..last).rev() {
            if let (_, layer, Some(next)) = neighbours(&mut self.layers, i) {
                layer.hidden_deltas(next);
            }
        }
        error
    }

    /// Applies weight updates to the network.
    fn update(&mut self, input: ArrayView1<f64>, rate: f64, momentum: f64) {
        for i in 0..self.layers.len() {
            let (previous, layer, _) = neighbours(&mut self.layers, i);
            match previous {
                Some(previous) => layer.update(previous.outputs(), rate, momentum),
                None => layer.update(input.view(), rate, momentum),
            }
        }
    }
}

impl Trainable for Network {
    type Example = TrainingRecord;

    fn check_example(&self, record: &TrainingRecord) -> Result<()> {
        check_len(self.num_inputs, record.input.len())?;
        check_len(self.num_outputs, record.output.len())
    }

    fn example_error(&self, record: &TrainingRecord) -> f64 {
        let outputs = self.predict(ArrayView1::from(record.input.as_slice()));
        outputs
            .iter()
            .zip(&record.output)
            .map(|(&y, &e)| (e - y) * (e - y))
            .sum()
    }

    fn train_example(&mut self, record: &TrainingRecord, rate: f64, momentum: f64) -> f64 {
        let input = ArrayView1::from(record.input.as_slice());
        self.feed_forward(input);
        let error = self.feed_backwards(&record.output);
        self.update(input, rate, momentum);
        error
    }
}

/// Returns the hidden layer size used when none is given.
pub fn default_hidden_size(num_inputs: usize, num_outputs: usize) -> usize {
    usize::max(3, (num_inputs + num_outputs) / 2)
}

/// Verifies every layer of a proposed network has at least one neuron.
pub(crate) fn check_topology(
    num_inputs: usize,
    hidden_layers: &[usize],
    num_outputs: usize,
) -> Result<()> {
    if num_inputs == 0 {
        return Err(Error::InvalidTopology("network has no inputs".into()));
    }
    if num_outputs == 0 {
        return Err(Error::InvalidTopology("network has no outputs".into()));
    }
    if let Some(i) = hidden_layers.iter().position(|&size| size == 0) {
        return Err(Error::InvalidTopology(format!("hidden layer {} is empty", i)));
    }
    Ok(())
}

/// Splits out layer `i` along with the layers on either side of it.
fn neighbours(
    layers: &mut [Layer],
    i: usize,
) -> (Option<&Layer>, &mut Layer, Option<&Layer>) {
    let (before, rest) = layers.split_at_mut(i);
    let (current, after) = rest.split_at_mut(1);
    (before.last(), &mut current[0], after.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(hidden: &[usize]) -> Network {
        let mut rng = StdRng::seed_from_u64(1);
        Network::with_rng(2, hidden, 1, &mut rng).unwrap()
    }

    fn or_records() -> Vec<TrainingRecord> {
        vec![
            ([0.0, 0.0], [0.0]).into(),
            ([0.0, 1.0], [1.0]).into(),
            ([1.0, 0.0], [1.0]).into(),
            ([1.0, 1.0], [1.0]).into(),
        ]
    }

    fn quiet() -> TrainingConfig {
        TrainingConfig::default().logging(crate::config::Logging::Silent)
    }

    #[test]
    fn empty_input_layer() {
        assert!(matches!(
            Network::with_hidden_layers(0, &[2], 1),
            Err(Error::InvalidTopology(_))
        ));
    }

    #[test]
    fn empty_hidden_layer() {
        assert!(matches!(
            Network::with_hidden_layers(2, &[0], 1),
            Err(Error::InvalidTopology(_))
        ));
        assert!(matches!(
            Network::with_hidden_layers(2, &[3, 0, 3], 1),
            Err(Error::InvalidTopology(_))
        ));
    }

    #[test]
    fn empty_output_layer() {
        assert!(matches!(Network::new(2, 0), Err(Error::InvalidTopology(_))));
    }

    #[test]
    fn layer_shapes_chain() {
        let network = Network::with_hidden_layers(3, &[5, 4], 2).unwrap();
        let shapes: Vec<_> = network.layers().iter().map(|l| l.weights().dim()).collect();
        assert_eq!(shapes, vec![(5, 3), (4, 5), (2, 4)]);
        assert_eq!(network.num_inputs(), 3);
        assert_eq!(network.num_outputs(), 2);
        assert_eq!(network.hidden_layers(), vec![5, 4]);
    }

    #[test]
    fn no_hidden_layers() {
        let network = Network::with_hidden_layers(3, &[], 2).unwrap();
        assert!(network.hidden_layers().is_empty());
        assert_eq!(network.layers()[0].weights().dim(), (2, 3));
        assert_eq!(network.run_input(&[1.0, 2.0, 3.0]).unwrap().len(), 2);
    }

    #[test]
    fn default_hidden_layer() {
        assert_eq!(Network::new(2, 1).unwrap().hidden_layers(), vec![3]);
        assert_eq!(Network::new(10, 4).unwrap().hidden_layers(), vec![7]);
    }

    #[test]
    fn fresh_network_state() {
        let network = Network::new(2, 1).unwrap();
        assert_eq!(network.state(), State::Constructed);
        assert!(!network.is_trained());
        assert_eq!(network.training_error(), None);
        assert_eq!(*network.config(), TrainingConfig::default());
    }

    #[test]
    fn run_matches_manual_computation() {
        let sigmoid = |x: f64| 1.0 / (1.0 + (-x).exp());
        let layers = vec![
            Layer::with_parameters(arr2(&[[1.0, 2.0], [-1.0, 0.5]]), arr1(&[0.0, 0.5])),
            Layer::with_parameters(arr2(&[[2.0, -3.0]]), arr1(&[0.25])),
        ];
        let network =
            Network::from_parts(2, 1, layers, TrainingConfig::default(), State::Constructed);
        let h0 = sigmoid(1.0 * 0.5 + 2.0 * -1.0);
        let h1 = sigmoid(-1.0 * 0.5 + 0.5 * -1.0 + 0.5);
        let expected = sigmoid(2.0 * h0 - 3.0 * h1 + 0.25);
        let output = network.run_input(&[0.5, -1.0]).unwrap();
        assert_relative_eq!(output[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn run_is_deterministic() {
        let network = seeded(&[4]);
        let first = network.run_input(&[0.3, 0.9]).unwrap();
        assert_eq!(network.run_input(&[0.3, 0.9]).unwrap(), first);
        assert_eq!(seeded(&[4]).run_input(&[0.3, 0.9]).unwrap(), first);
    }

    #[test]
    fn run_rejects_wrong_width() {
        let network = seeded(&[4]);
        assert_eq!(
            network.run_input(&[1.0]),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 1,
            })
        );
        assert!(network.run_input(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn train_rejects_bad_records_without_training() {
        let mut network = seeded(&[4]).with_config(quiet());
        let before = network.run_input(&[1.0, 0.0]).unwrap();

        let mut records = or_records();
        records.push(TrainingRecord::new(vec![1.0], vec![1.0]));
        assert_eq!(
            network.train(&records),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 1,
            })
        );
        let bad_output = vec![TrainingRecord::new(vec![1.0, 1.0], vec![1.0, 0.0])];
        assert!(matches!(
            network.train(&bad_output),
            Err(Error::DimensionMismatch { .. })
        ));

        assert!(!network.is_trained());
        assert_eq!(network.run_input(&[1.0, 0.0]).unwrap(), before);
        assert!(network.train(&or_records()).is_ok());
    }

    #[test]
    fn trains_only_once() {
        let mut network = seeded(&[4]).with_config(quiet().max_iterations(50));
        let error = network.train(&or_records()).unwrap();
        assert!(network.is_trained());
        assert_eq!(network.training_error(), Some(error));
        let after_first = network.run_input(&[1.0, 0.0]).unwrap();

        let second = network.train(&or_records());
        assert_eq!(second, Err(Error::AlreadyTrained));
        assert_eq!(second.unwrap_err().sentinel(), Some(-1.0));
        assert_eq!(network.run_input(&[1.0, 0.0]).unwrap(), after_first);
        assert_eq!(network.training_error(), Some(error));
    }

    #[test]
    fn iteration_cap_still_marks_trained() {
        let mut network = seeded(&[4]).with_config(quiet().max_iterations(3).min_error(0.0));
        network.train(&or_records()).unwrap();
        match network.state() {
            State::Trained { iterations, .. } => assert_eq!(iterations, 3),
            State::Constructed => panic!("network should be trained"),
        }
    }

    #[test]
    fn zero_iteration_cap_leaves_weights() {
        let mut network = seeded(&[3]).with_config(quiet().max_iterations(0));
        let before = network.layers()[0].weights().clone();
        let expected: f64 = or_records()
            .iter()
            .map(|r| (r.output[0] - network.run_input(&r.input).unwrap()[0]).powi(2))
            .sum();

        let error = network.train(&or_records()).unwrap();
        assert_relative_eq!(error, expected, epsilon = 1e-12);
        assert_eq!(network.state(), State::Trained { iterations: 0, error });
        assert_eq!(*network.layers()[0].weights(), before);
    }

    #[test]
    fn trains_two_layers_deep_with_progress_logging() {
        let config = TrainingConfig::default()
            .max_iterations(2)
            .min_error(0.0)
            .logging(crate::config::Logging::Iterations(1));
        let mut network = seeded(&[3, 2]).with_config(config);
        let first = network.layers()[0].weights().clone();
        network.train(&or_records()).unwrap();
        assert_eq!(
            network.state(),
            State::Trained {
                iterations: 2,
                error: network.training_error().unwrap(),
            }
        );
        // Every layer, including the first, gets its own update.
        assert_ne!(*network.layers()[0].weights(), first);
    }

    #[test]
    fn config_after_training_is_ignored() {
        let mut network = seeded(&[4]).with_config(quiet().max_iterations(5));
        network.train(&or_records()).unwrap();
        network.set_config(quiet().max_iterations(1000));
        assert_eq!(network.train(&or_records()), Err(Error::AlreadyTrained));
        assert_eq!(network.config().max_iterations, 1000);
    }

    #[test]
    fn empty_training_set() {
        let mut network = seeded(&[4]).with_config(quiet());
        assert_eq!(network.train(&[]), Ok(0.0));
        assert_eq!(
            network.state(),
            State::Trained {
                iterations: 1,
                error: 0.0,
            }
        );
    }

    #[test]
    fn single_record_step_matches_update_rule() {
        // One sigmoid neuron, two inputs, no hidden layer.
        let layers = vec![Layer::with_parameters(arr2(&[[0.5, -0.5]]), arr1(&[0.1]))];
        let mut network = Network::from_parts(
            2,
            1,
            layers,
            quiet().max_iterations(1).min_error(0.0).learning_rate(0.5),
            State::Constructed,
        );
        let y = 1.0 / (1.0 + (-(0.5 * 1.0 - 0.5 * 0.5 + 0.1_f64)).exp());
        let delta = (1.0 - y) * y * (1.0 - y);

        let error = network
            .train(&[TrainingRecord::new(vec![1.0, 0.5], vec![1.0])])
            .unwrap();
        assert_relative_eq!(error, (1.0 - y) * (1.0 - y), epsilon = 1e-12);
        let layer = &network.layers()[0];
        assert_relative_eq!(layer.weights()[[0, 0]], 0.5 + 0.5 * delta * 1.0, epsilon = 1e-12);
        assert_relative_eq!(layer.weights()[[0, 1]], -0.5 + 0.5 * delta * 0.5, epsilon = 1e-12);
        assert_relative_eq!(layer.biases()[0], 0.1 + 0.5 * delta, epsilon = 1e-12);
    }
}
