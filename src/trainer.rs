//! Utilities for training neural networks.

use crate::config::TrainingConfig;
use crate::error::Result;

use std::time::Instant;

/// Makes a model trainable using online gradient descent with momentum.
pub trait Trainable {
    /// A single labelled example.
    type Example;

    /// Returns an error if `example` cannot be used to train this model.
    fn check_example(&self, example: &Self::Example) -> Result<()>;

    /// Returns the squared error of the model's prediction for `example`
    /// without changing the model.
    fn example_error(&self, example: &Self::Example) -> f64;

    /// Runs `example` forward and backward through the model and immediately
    /// applies the resulting update. Returns the squared error of the
    /// prediction made before the update.
    fn train_example(&mut self, example: &Self::Example, rate: f64, momentum: f64) -> f64;
}

/// The result of a completed training run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Outcome {
    /// The number of passes made over the training set.
    pub iterations: usize,
    /// The summed error of the final pass.
    pub error: f64,
    /// Whether training stopped because the error threshold was reached.
    pub converged: bool,
}

/// Drives a `Trainable` model through repeated passes over a training set.
#[derive(Debug)]
pub struct Trainer<'a> {
    config: &'a TrainingConfig,
}

impl<'a> Trainer<'a> {
    pub fn new(config: &'a TrainingConfig) -> Self {
        Trainer { config }
    }

    /// Verifies every example against `model`, returning the first error.
    pub fn validate<T: Trainable>(&self, model: &T, examples: &[T::Example]) -> Result<()> {
        for example in examples {
            model.check_example(example)?;
        }
        Ok(())
    }

    /// Trains `model` on `examples` until the error threshold is met or the
    /// iteration cap is reached.
    ///
    /// Examples are applied one at a time, in order, and the model is updated
    /// after each one. With a cap of zero no pass is made and the model is
    /// left as it was; the reported error is then that of the untouched
    /// model over `examples`.
    pub fn train<T: Trainable>(&self, model: &mut T, examples: &[T::Example]) -> Outcome {
        let config = self.config;
        let start_time = Instant::now();
        let mut iteration = 0;
        let mut last_error = None;
        let mut converged = false;
        while iteration < config.max_iterations {
            let mut training_error = 0.0;
            for example in examples {
                training_error +=
                    model.train_example(example, config.learning_rate, config.momentum);
            }
            iteration += 1;
            last_error = Some(training_error);

            config.logging.iteration(iteration, training_error);
            if config.converged(training_error) {
                converged = true;
                break;
            }
        }
        let training_error = last_error
            .unwrap_or_else(|| examples.iter().map(|e| model.example_error(e)).sum());
        config
            .logging
            .completion(iteration, training_error, converged, start_time);
        Outcome {
            iterations: iteration,
            error: training_error,
            converged,
        }
    }
}
