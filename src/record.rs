//! Labelled examples used for training.

/// A single labelled training example.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingRecord {
    /// Network input, one value per input neuron.
    pub input: Vec<f64>,
    /// Expected network output, one value per output neuron.
    pub output: Vec<f64>,
}

impl TrainingRecord {
    /// Creates a record from an input vector and its expected output.
    pub fn new<I, O>(input: I, output: O) -> Self
    where
        I: Into<Vec<f64>>,
        O: Into<Vec<f64>>,
    {
        TrainingRecord {
            input: input.into(),
            output: output.into(),
        }
    }
}

impl<const I: usize, const O: usize> From<([f64; I], [f64; O])> for TrainingRecord {
    fn from((input, output): ([f64; I], [f64; O])) -> Self {
        TrainingRecord::new(input.to_vec(), output.to_vec())
    }
}
