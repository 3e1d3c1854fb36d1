//! Serializable copies of a network's topology and parameters.
//!
//! A `Snapshot` holds everything needed to rebuild a network that produces
//! the same outputs: its dimensions, configuration, training state, and the
//! weights and biases of every layer in order. Weights are stored row-major,
//! one row per neuron and one column per neuron of the previous layer.
//!
//! The format is left to the caller; any `serde` data format works.

use crate::config::TrainingConfig;
use crate::error::{check_len, Error, Result};
use crate::layer::Layer;
use crate::matrix;
use crate::network::{check_topology, Network, State};

use log::debug;
use ndarray::Array1;
use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub config: TrainingConfig,
    pub state: State,
    /// Hidden layers followed by the output layer.
    pub layers: Vec<LayerSnapshot>,
}

impl Network {
    /// Copies out the network's topology, parameters and configuration.
    pub fn snapshot(&self) -> Snapshot {
        let layers = self
            .layers()
            .iter()
            .map(|layer| LayerSnapshot {
                weights: matrix::to_rows(layer.weights()),
                biases: layer.biases().to_vec(),
            })
            .collect();
        Snapshot {
            num_inputs: self.num_inputs(),
            num_outputs: self.num_outputs(),
            config: *self.config(),
            state: self.state(),
            layers,
        }
    }

    /// Rebuilds a network from a snapshot.
    ///
    /// Momentum carried between updates is not part of a snapshot, so a
    /// restored network that has not been trained yet starts training from
    /// rest.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Network> {
        let (output_layer, hidden) = match snapshot.layers.split_last() {
            Some(split) => split,
            None => return Err(Error::InvalidTopology("snapshot has no layers".into())),
        };
        let hidden_sizes: Vec<usize> = hidden.iter().map(|l| l.biases.len()).collect();
        check_topology(snapshot.num_inputs, &hidden_sizes, snapshot.num_outputs)?;
        check_len(snapshot.num_outputs, output_layer.biases.len())?;

        let mut layers = Vec::with_capacity(snapshot.layers.len());
        let mut inputs = snapshot.num_inputs;
        for layer in &snapshot.layers {
            check_len(layer.biases.len(), layer.weights.len())?;
            let weights = matrix::from_rows(&layer.weights, inputs)?;
            layers.push(Layer::with_parameters(
                weights,
                Array1::from(layer.biases.clone()),
            ));
            inputs = layer.biases.len();
        }
        debug!(
            "restored network {} -> {:?} -> {}",
            snapshot.num_inputs, hidden_sizes, snapshot.num_outputs
        );
        Ok(Network::from_parts(
            snapshot.num_inputs,
            snapshot.num_outputs,
            layers,
            snapshot.config,
            snapshot.state,
        ))
    }
}
