use statrs::statistics::Statistics;

use crate::error::ModelError;

/// Pearson correlation between estimated and true abilities.
///
/// NaN when either side has zero variance or fewer than two values.
pub fn correlation(estimated: &[f64], truth: &[f64]) -> Result<f64, ModelError> {
    if estimated.len() != truth.len() {
        return Err(ModelError::DimensionMismatch {
            expected: truth.len(),
            actual: estimated.len()
        });
    }
    if truth.len() < 2 {
        return Ok(f64::NAN);
    }

    let covariance = estimated.covariance(truth);
    Ok(covariance / (estimated.std_dev() * truth.std_dev()))
}
