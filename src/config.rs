//! Training configuration.

use log::info;
use serde_derive::{Deserialize, Serialize};
use std::time::Instant;

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// A summary will be logged after every `n` training iterations
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `iteration` of training.
    pub(crate) fn iteration(&self, iteration: usize, training_error: f64) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && iteration % freq == 0 {
                info!("iteration {}: error={}", iteration, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    pub(crate) fn completion(
        &self,
        iterations: usize,
        training_error: f64,
        converged: bool,
        start_time: Instant,
    ) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "training {} after {} iterations in {:.3} seconds, final error {}",
            if converged { "converged" } else { "stopped" },
            iterations,
            start_time.elapsed().as_secs_f64(),
            training_error
        );
    }
}

/// Parameters controlling a training run.
///
/// The defaults are:
///
/// * At most 20000 training iterations.
/// * Stops once the training error is at most 0.005.
/// * A learning rate of 0.3.
/// * A momentum of 0.1.
/// * Logs on training completion.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub max_iterations: usize,
    pub min_error: f64,
    pub learning_rate: f64,
    pub momentum: f64,
    pub logging: Logging,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            max_iterations: 20_000,
            min_error: 0.005,
            learning_rate: 0.3,
            momentum: 0.1,
            logging: Logging::Completion,
        }
    }
}

impl TrainingConfig {
    /// Sets the maximum number of passes over the training set.
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the training error at which to stop early.
    pub fn min_error(mut self, error: f64) -> Self {
        self.min_error = error;
        self
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the fraction of the previous update carried into the next one.
    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Returns true if the training error is low enough to stop.
    pub(crate) fn converged(&self, training_error: f64) -> bool {
        training_error <= self.min_error
    }
}
