use crate::{
    error::ModelError,
    inference::LogDensity,
    model::{ability::AbilityPrior, likelihood::Comparisons}
};

/// Log-posterior of the abilities (and `log sigma` for the hierarchical prior)
/// given observed matches: prior log-density plus log-likelihood.
///
/// Parameter layout: `theta = [alpha_1, ..., alpha_K, log sigma?]`.
pub struct LogPosterior<'a, C: Comparisons + ?Sized> {
    data: &'a C,
    prior: AbilityPrior
}

impl<'a, C: Comparisons + ?Sized> LogPosterior<'a, C> {
    pub fn new(data: &'a C, prior: AbilityPrior) -> LogPosterior<'a, C> {
        LogPosterior { data, prior }
    }

    pub fn data(&self) -> &C {
        self.data
    }

    pub fn prior(&self) -> AbilityPrior {
        self.prior
    }

    pub fn num_players(&self) -> usize {
        self.data.num_players()
    }

    /// All abilities at zero, `sigma` at the center of its prior.
    pub fn initial_point(&self) -> Vec<f64> {
        let mut theta = vec![0.0; self.num_players()];
        if let AbilityPrior::Hierarchical { scale_location, .. } = self.prior {
            theta.push(scale_location);
        }

        theta
    }

    fn check_dimension(&self, theta: &[f64]) -> Result<(), ModelError> {
        if theta.len() != self.dim() {
            return Err(ModelError::DimensionMismatch {
                expected: self.dim(),
                actual: theta.len()
            });
        }

        Ok(())
    }
}

impl<C: Comparisons + ?Sized> LogDensity for LogPosterior<'_, C> {
    fn dim(&self) -> usize {
        self.num_players() + self.prior.num_hyperparameters()
    }

    fn parameter_names(&self) -> Vec<String> {
        (1..=self.num_players())
            .map(|k| format!("alpha[{}]", k))
            .chain(self.prior.hyperparameter_names().iter().map(|name| name.to_string()))
            .collect()
    }

    fn log_density(&self, theta: &[f64]) -> Result<f64, ModelError> {
        self.check_dimension(theta)?;
        let (abilities, hyperparameters) = theta.split_at(self.num_players());

        let prior = self.prior.log_density(abilities, hyperparameters)?;
        if !prior.is_finite() {
            return Ok(prior);
        }

        Ok(prior + self.data.log_likelihood(abilities)?)
    }

    fn log_density_gradient(&self, theta: &[f64], gradient: &mut [f64]) -> Result<f64, ModelError> {
        self.check_dimension(theta)?;
        if gradient.len() != theta.len() {
            return Err(ModelError::DimensionMismatch {
                expected: theta.len(),
                actual: gradient.len()
            });
        }

        gradient.fill(0.0);
        let k = self.num_players();
        let (abilities, hyperparameters) = theta.split_at(k);
        let (ability_gradient, hyper_gradient) = gradient.split_at_mut(k);

        let prior = self
            .prior
            .log_density_gradient(abilities, hyperparameters, ability_gradient, hyper_gradient)?;
        if !prior.is_finite() {
            return Ok(prior);
        }

        Ok(prior + self.data.log_likelihood_gradient(abilities, ability_gradient)?)
    }

    fn constrain(&self, theta: &[f64]) -> Vec<f64> {
        let (abilities, hyperparameters) = theta.split_at(self.num_players().min(theta.len()));

        abilities
            .iter()
            .copied()
            .chain(self.prior.constrain(hyperparameters))
            .collect()
    }
}
