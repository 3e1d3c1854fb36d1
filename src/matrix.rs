use crate::error::{check_len, Error, Result};

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::Rng;

/// Weights and biases start uniformly distributed in `[-INIT_RANGE, INIT_RANGE]`.
pub const INIT_RANGE: f64 = 1.0;

fn init_distribution() -> Uniform<f64> {
    Uniform::new_inclusive(-INIT_RANGE, INIT_RANGE)
}

/// Returns a `rows x cols` matrix of freshly initialized weights.
pub fn random_matrix<R>(rng: &mut R, rows: usize, cols: usize) -> Array2<f64>
where
    R: Rng + ?Sized,
{
    Array2::random_using((rows, cols), init_distribution(), rng)
}

/// Returns a vector of `len` freshly initialized biases.
pub fn random_vector<R>(rng: &mut R, len: usize) -> Array1<f64>
where
    R: Rng + ?Sized,
{
    Array1::random_using(len, init_distribution(), rng)
}

/// Copies `matrix` out as one `Vec` per row.
pub fn to_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Builds a `rows.len() x cols` matrix, rejecting rows of any other width.
pub fn from_rows(rows: &[Vec<f64>], cols: usize) -> Result<Array2<f64>> {
    let mut data = Vec::with_capacity(rows.len() * cols);
    for row in rows {
        check_len(cols, row.len())?;
        data.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), cols), data)
        .map_err(|e| Error::InvalidTopology(e.to_string()))
}
