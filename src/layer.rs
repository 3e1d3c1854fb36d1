use crate::activator::Sigmoid;
use crate::matrix;

use itertools::multizip;
use ndarray::linalg::general_mat_vec_mul;
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};
use rand::Rng;

/// A wrapper for a single fully connected layer of the neural network
///
/// Every buffer is sized once at construction and reused for every training
/// example.
#[derive(Clone, Debug)]
pub struct Layer {
    /// The activation function used for every neuron in the layer.
    activator: Sigmoid,
    /// The network weights, with each neuron's weights stored as a row.
    weights: Array2<f64>,
    biases: Array1<f64>,
    /// The previous update applied to each weight, for momentum.
    last_weight_delta: Array2<f64>,
    /// The previous update applied to each bias, for momentum.
    last_bias_delta: Array1<f64>,
    /// Activations from the most recent training forward pass.
    outputs: Array1<f64>,
    /// Error terms from the most recent backward pass.
    deltas: Array1<f64>,
}

impl Layer {
    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `rng` - the source for the initial weights and biases.
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of outputs from this layer.
    pub fn new<R>(rng: &mut R, inputs: usize, outputs: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = matrix::random_matrix(rng, outputs, inputs);
        let biases = matrix::random_vector(rng, outputs);
        Layer::with_parameters(weights, biases)
    }

    /// Builds a layer around existing parameters. `weights` must have one row
    /// per entry of `biases`.
    pub fn with_parameters(weights: Array2<f64>, biases: Array1<f64>) -> Self {
        debug_assert_eq!(weights.nrows(), biases.len());
        let (rows, cols) = weights.dim();
        Layer {
            activator: Sigmoid,
            weights,
            biases,
            last_weight_delta: Array2::zeros((rows, cols)),
            last_bias_delta: Array1::zeros(rows),
            outputs: Array1::zeros(rows),
            deltas: Array1::zeros(rows),
        }
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.weights.ncols()
    }

    /// Returns the number of neurons in this layer.
    pub fn output_len(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f64> {
        &self.biases
    }

    /// Activations stored by the last call to `forward`.
    pub fn outputs(&self) -> ArrayView1<f64> {
        self.outputs.view()
    }

    /// Feeds `inputs` through the layer into `outputs` without touching the
    /// layer's own buffers.
    pub fn activate(&self, inputs: ArrayView1<f64>, mut outputs: ArrayViewMut1<f64>) {
        debug_assert_eq!(inputs.len(), self.input_len());
        debug_assert_eq!(outputs.len(), self.output_len());
        outputs.assign(&self.biases);
        general_mat_vec_mul(1.0, &self.weights, &inputs, 1.0, &mut outputs);
        let activator = self.activator;
        outputs.mapv_inplace(|x| activator.f(x));
    }

    /// Feeds `inputs` through the layer, keeping the activations for the
    /// backward pass.
    pub fn forward(&mut self, inputs: ArrayView1<f64>) {
        debug_assert_eq!(inputs.len(), self.input_len());
        self.outputs.assign(&self.biases);
        general_mat_vec_mul(1.0, &self.weights, &inputs, 1.0, &mut self.outputs);
        let activator = self.activator;
        self.outputs.mapv_inplace(|x| activator.f(x));
    }

    /// Computes the error terms of an output layer against `expected`.
    ///
    /// Returns the sum of squared differences between `expected` and the
    /// stored outputs.
    pub fn output_deltas(&mut self, expected: &[f64]) -> f64 {
        debug_assert_eq!(expected.len(), self.output_len());
        let mut error = 0.0;
        for (d, &y, &e) in multizip((self.deltas.iter_mut(), self.outputs.iter(), expected)) {
            let diff = e - y;
            *d = diff * self.activator.fprime(y);
            error += diff * diff;
        }
        error
    }

    /// Computes the error terms of a hidden layer by feeding the error terms
    /// of `next` backwards through its weights.
    pub fn hidden_deltas(&mut self, next: &Layer) {
        debug_assert_eq!(next.input_len(), self.output_len());
        general_mat_vec_mul(1.0, &next.weights.t(), &next.deltas, 0.0, &mut self.deltas);
        for (d, &y) in self.deltas.iter_mut().zip(self.outputs.iter()) {
            *d *= self.activator.fprime(y);
        }
    }

    /// Applies one momentum gradient step using the stored error terms.
    ///
    /// `inputs` must be the same activations that fed the forward pass.
    pub fn update(&mut self, inputs: ArrayView1<f64>, rate: f64, momentum: f64) {
        debug_assert_eq!(inputs.len(), self.input_len());
        for (weights, last, &d) in multizip((
            self.weights.rows_mut(),
            self.last_weight_delta.rows_mut(),
            self.deltas.iter(),
        )) {
            for (w, l, &x) in multizip((weights, last, inputs.iter())) {
                let change = rate * d * x + momentum * *l;
                *w += change;
                *l = change;
            }
        }
        for (b, l, &d) in multizip((
            self.biases.iter_mut(),
            self.last_bias_delta.iter_mut(),
            self.deltas.iter(),
        )) {
            let change = rate * d + momentum * *l;
            *b += change;
            *l = change;
        }
    }
}
