use statrs::distribution::{Continuous, LogNormal, Normal};

use crate::{
    error::ModelError,
    model::{
        constants::{NORMAL_PRIOR_SCALE, SCALE_PRIOR_LOCATION, SCALE_PRIOR_SCALE},
        structures::prior_kind::PriorKind
    }
};

/// Population prior over the abilities, used during inference only.
///
/// The hierarchical variant carries one hyperparameter, `sigma`, which is
/// always handled as `log sigma` so that optimizers and samplers move over the
/// whole real line and never reach `sigma <= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityPrior {
    Flat,
    Gaussian { scale: f64 },
    Hierarchical { scale_location: f64, scale_scale: f64 }
}

impl From<PriorKind> for AbilityPrior {
    fn from(kind: PriorKind) -> Self {
        match kind {
            PriorKind::Flat => AbilityPrior::Flat,
            PriorKind::Normal => AbilityPrior::Gaussian {
                scale: NORMAL_PRIOR_SCALE
            },
            PriorKind::Hierarchical => AbilityPrior::Hierarchical {
                scale_location: SCALE_PRIOR_LOCATION,
                scale_scale: SCALE_PRIOR_SCALE
            }
        }
    }
}

impl AbilityPrior {
    pub fn gaussian(scale: f64) -> Result<AbilityPrior, ModelError> {
        Ok(AbilityPrior::Gaussian {
            scale: positive(scale)?
        })
    }

    /// `sigma ~ LogNormal(scale_location, scale_scale)`, `alpha[k] ~ Normal(0, sigma)`.
    pub fn hierarchical(scale_location: f64, scale_scale: f64) -> Result<AbilityPrior, ModelError> {
        if !scale_location.is_finite() {
            return Err(ModelError::InvalidConfig(format!(
                "scale prior location must be finite, got {}",
                scale_location
            )));
        }

        Ok(AbilityPrior::Hierarchical {
            scale_location,
            scale_scale: positive(scale_scale)?
        })
    }

    pub fn num_hyperparameters(&self) -> usize {
        match self {
            AbilityPrior::Hierarchical { .. } => 1,
            _ => 0
        }
    }

    pub fn hyperparameter_names(&self) -> &'static [&'static str] {
        match self {
            AbilityPrior::Hierarchical { .. } => &["sigma"],
            _ => &[]
        }
    }

    /// Maps unconstrained hyperparameters (`log sigma`) to their natural scale.
    pub fn constrain(&self, unconstrained: &[f64]) -> Vec<f64> {
        unconstrained.iter().map(|tau| tau.exp()).collect()
    }

    /// Inverse of [`AbilityPrior::constrain`]. Rejects non-positive scales.
    pub fn unconstrain(&self, constrained: &[f64]) -> Result<Vec<f64>, ModelError> {
        constrained.iter().map(|&sigma| positive(sigma).map(f64::ln)).collect()
    }

    pub fn log_density(&self, abilities: &[f64], hyperparameters: &[f64]) -> Result<f64, ModelError> {
        let mut ability_gradient = vec![0.0; abilities.len()];
        let mut hyper_gradient = vec![0.0; hyperparameters.len()];

        self.log_density_gradient(abilities, hyperparameters, &mut ability_gradient, &mut hyper_gradient)
    }

    /// Returns the prior log-density on the unconstrained scale and adds its
    /// gradient into `ability_gradient` and `hyper_gradient`.
    pub fn log_density_gradient(
        &self,
        abilities: &[f64],
        hyperparameters: &[f64],
        ability_gradient: &mut [f64],
        hyper_gradient: &mut [f64]
    ) -> Result<f64, ModelError> {
        if hyperparameters.len() != self.num_hyperparameters() {
            return Err(ModelError::DimensionMismatch {
                expected: self.num_hyperparameters(),
                actual: hyperparameters.len()
            });
        }
        if ability_gradient.len() < abilities.len() {
            return Err(ModelError::DimensionMismatch {
                expected: abilities.len(),
                actual: ability_gradient.len()
            });
        }
        if hyper_gradient.len() < hyperparameters.len() {
            return Err(ModelError::DimensionMismatch {
                expected: hyperparameters.len(),
                actual: hyper_gradient.len()
            });
        }

        match *self {
            AbilityPrior::Flat => Ok(0.0),
            AbilityPrior::Gaussian { scale } => {
                let normal = Normal::new(0.0, scale).map_err(|_| ModelError::NonPositiveScale(scale))?;
                let variance = scale * scale;

                let mut total = 0.0;
                for (k, &alpha) in abilities.iter().enumerate() {
                    total += normal.ln_pdf(alpha);
                    ability_gradient[k] -= alpha / variance;
                }

                Ok(total)
            }
            AbilityPrior::Hierarchical {
                scale_location,
                scale_scale
            } => {
                let log_sigma = hyperparameters[0];
                let sigma = log_sigma.exp();

                // exp(log sigma) under- or overflowed: the point has no density
                let Ok(population) = Normal::new(0.0, sigma) else {
                    return Ok(f64::NEG_INFINITY);
                };
                let scale_prior = LogNormal::new(scale_location, scale_scale)
                    .map_err(|_| ModelError::NonPositiveScale(scale_scale))?;

                // LogNormal density of sigma plus the log-Jacobian of sigma = exp(log sigma)
                let mut total = scale_prior.ln_pdf(sigma) + log_sigma;
                let mut d_log_sigma = -(log_sigma - scale_location) / (scale_scale * scale_scale);

                let variance = sigma * sigma;
                for (k, &alpha) in abilities.iter().enumerate() {
                    total += population.ln_pdf(alpha);
                    ability_gradient[k] -= alpha / variance;
                    d_log_sigma += alpha * alpha / variance - 1.0;
                }
                hyper_gradient[0] += d_log_sigma;

                Ok(total)
            }
        }
    }
}

/// Shifts abilities so that they sum to zero.
///
/// Used for simulated ground truth only; inference relies on the soft prior instead.
pub fn center(abilities: &mut [f64]) {
    if abilities.is_empty() {
        return;
    }

    let mean = abilities.iter().sum::<f64>() / abilities.len() as f64;
    for alpha in abilities.iter_mut() {
        *alpha -= mean;
    }
}

fn positive(scale: f64) -> Result<f64, ModelError> {
    if scale > 0.0 && scale.is_finite() {
        Ok(scale)
    } else {
        Err(ModelError::NonPositiveScale(scale))
    }
}
