//! The activation function used by every neuron.

/// The logistic [sigmoid](https://en.wikipedia.org/wiki/Sigmoid_function),
/// `1 / (1 + e^-x)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl Sigmoid {
    /// Evaluates `f(x)`.
    #[inline]
    pub fn f(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Evaluates the derivative `f'(x)`, where `x = f^{-1}(y)`.
    ///
    /// Note that this function takes in the *output* of the activation
    /// function, rather than the input. This is an optimization that means we
    /// don't have to store the intermediate results before activation.
    #[inline]
    pub fn fprime(&self, y: f64) -> f64 {
        y * (1.0 - y)
    }
}
