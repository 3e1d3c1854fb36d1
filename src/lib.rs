//! A small feedforward neural network trained by backpropagation with
//! momentum.
//!
//! Build a `Network`, optionally adjust its `TrainingConfig`, train it once on
//! a set of `TrainingRecord`s, then call `run_input` as often as needed. See
//! the `network` module for a complete example.

pub mod activator;
pub mod config;
pub mod error;
pub mod network;
pub mod record;
pub mod snapshot;

mod layer;
mod matrix;
mod trainer;

pub use crate::config::{Logging, TrainingConfig};
pub use crate::error::{Error, Result, ALREADY_TRAINED_SENTINEL};
pub use crate::network::{Network, State};
pub use crate::record::TrainingRecord;
pub use crate::snapshot::{LayerSnapshot, Snapshot};
