use tracing::{debug, info, warn};

use crate::{
    error::ModelError,
    inference::{warning::ConvergenceWarning, LogDensity},
    model::constants::{ARMIJO_CONSTANT, GRADIENT_TOLERANCE, INITIAL_STEP_SIZE, MAX_BACKTRACKS, MAX_ITERATIONS}
};

/// Point estimation by gradient ascent with Armijo backtracking.
///
/// The step grows after every accepted move and halves on every rejected one.
/// Stops once the largest gradient component falls below `tolerance`.
#[derive(Debug, Clone)]
pub struct GradientAscent {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub initial_step_size: f64
}

impl Default for GradientAscent {
    fn default() -> Self {
        GradientAscent {
            max_iterations: MAX_ITERATIONS,
            tolerance: GRADIENT_TOLERANCE,
            initial_step_size: INITIAL_STEP_SIZE
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Unconstrained parameters at the final iterate
    pub parameters: Vec<f64>,
    pub log_density: f64,
    pub iterations: usize,
    pub converged: bool,
    /// Largest absolute gradient component at the final iterate
    pub gradient_norm: f64,
    pub warning: Option<ConvergenceWarning>
}

impl GradientAscent {
    pub fn maximize<D: LogDensity + ?Sized>(&self, density: &D, initial: &[f64]) -> Result<OptimizationResult, ModelError> {
        self.validate()?;
        if initial.len() != density.dim() {
            return Err(ModelError::DimensionMismatch {
                expected: density.dim(),
                actual: initial.len()
            });
        }

        info!("Maximizing log-density over {} parameters", density.dim());

        let dim = density.dim();
        let mut x = initial.to_vec();
        let mut gradient = vec![0.0; dim];
        let mut value = density.log_density_gradient(&x, &mut gradient)?;
        if !value.is_finite() {
            return Err(ModelError::NonFiniteDensity);
        }

        let mut candidate = vec![0.0; dim];
        let mut candidate_gradient = vec![0.0; dim];
        let mut step = self.initial_step_size;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            if max_abs(&gradient) < self.tolerance {
                converged = true;
                break;
            }
            iterations += 1;

            let squared_norm: f64 = gradient.iter().map(|g| g * g).sum();
            let mut accepted = false;

            for _ in 0..MAX_BACKTRACKS {
                for i in 0..dim {
                    candidate[i] = x[i] + step * gradient[i];
                }
                let candidate_value = density.log_density_gradient(&candidate, &mut candidate_gradient)?;

                if candidate_value.is_finite() && candidate_value >= value + ARMIJO_CONSTANT * step * squared_norm {
                    std::mem::swap(&mut x, &mut candidate);
                    std::mem::swap(&mut gradient, &mut candidate_gradient);
                    value = candidate_value;
                    step *= 2.0;
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }

            if !accepted {
                debug!("Line search failed at iteration {}", iterations);
                break;
            }

            if iterations % 100 == 0 {
                debug!(
                    "Iteration {}: log-density {:.6}, gradient norm {:.3e}",
                    iterations,
                    value,
                    max_abs(&gradient)
                );
            }
        }

        let gradient_norm = max_abs(&gradient);
        converged = converged || gradient_norm < self.tolerance;

        let warning = if converged {
            info!("Converged after {} iterations, log-density {:.6}", iterations, value);
            None
        } else {
            let warning = ConvergenceWarning::NotConverged {
                iterations,
                gradient_norm
            };
            warn!("{}", warning);
            Some(warning)
        };

        Ok(OptimizationResult {
            parameters: x,
            log_density: value,
            iterations,
            converged,
            gradient_norm,
            warning
        })
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.tolerance <= 0.0 || !self.tolerance.is_finite() {
            return Err(ModelError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.initial_step_size <= 0.0 || !self.initial_step_size.is_finite() {
            return Err(ModelError::InvalidConfig(format!(
                "initial step size must be positive, got {}",
                self.initial_step_size
            )));
        }

        Ok(())
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}
