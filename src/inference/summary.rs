use indexmap::IndexMap;
use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics, Statistics};
use tracing::warn;

use crate::{
    error::ModelError,
    inference::{
        diagnostics::{effective_sample_size, split_rhat},
        sampler::PosteriorDraws,
        warning::ConvergenceWarning
    },
    model::{
        constants::{MIN_EFFECTIVE_SAMPLES, RHAT_THRESHOLD},
        ranking::{point_ranking, ranks}
    }
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSummary {
    pub mean: f64,
    pub sd: f64,
    pub q05: f64,
    pub q50: f64,
    pub q95: f64,
    pub rhat: f64,
    pub ess: f64
}

impl ParameterSummary {
    pub fn from_chains(chains: &[Vec<f64>]) -> ParameterSummary {
        let pooled: Vec<f64> = chains.iter().flatten().copied().collect();
        let mut data = Data::new(pooled.clone());

        ParameterSummary {
            mean: pooled.iter().mean(),
            sd: pooled.iter().std_dev(),
            q05: data.quantile(0.05),
            q50: data.quantile(0.5),
            q95: data.quantile(0.95),
            rhat: split_rhat(chains),
            ess: effective_sample_size(chains)
        }
    }
}

/// Per-parameter summaries in parameter order, plus every diagnostic that
/// crossed its threshold.
#[derive(Debug, Clone, Serialize)]
pub struct PosteriorSummary {
    pub parameters: IndexMap<String, ParameterSummary>,
    pub divergences: usize,
    pub warnings: Vec<ConvergenceWarning>
}

impl PosteriorSummary {
    pub fn from_draws(draws: &PosteriorDraws) -> PosteriorSummary {
        let mut parameters = IndexMap::new();
        let mut warnings = Vec::new();

        for (i, name) in draws.parameter_names.iter().enumerate() {
            let summary = ParameterSummary::from_chains(&draws.parameter_chains(i));

            if summary.rhat.is_nan() || summary.rhat > RHAT_THRESHOLD {
                warnings.push(ConvergenceWarning::HighRhat {
                    parameter: name.clone(),
                    rhat: summary.rhat
                });
            }
            if summary.ess.is_nan() || summary.ess < MIN_EFFECTIVE_SAMPLES {
                warnings.push(ConvergenceWarning::LowEss {
                    parameter: name.clone(),
                    ess: summary.ess
                });
            }

            parameters.insert(name.clone(), summary);
        }

        for (chain, output) in draws.chains.iter().enumerate() {
            if output.divergences > 0 {
                warnings.push(ConvergenceWarning::Divergences {
                    chain,
                    count: output.divergences
                });
            }
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        PosteriorSummary {
            parameters,
            divergences: draws.chains.iter().map(|c| c.divergences).sum(),
            warnings
        }
    }

    /// Posterior means of the first `num_players` parameters.
    pub fn mean_abilities(&self, num_players: usize) -> Vec<f64> {
        self.parameters.values().take(num_players).map(|s| s.mean).collect()
    }
}

/// Output of point estimation on the constrained scale.
#[derive(Debug, Clone, Serialize)]
pub struct PointEstimate {
    pub estimates: IndexMap<String, f64>,
    /// 1-based player indices, strongest first
    pub ranked: Vec<usize>,
    /// Rank of each player, 1 = best
    pub ranking: Vec<usize>,
    pub log_density: f64,
    pub iterations: usize,
    pub converged: bool,
    pub warnings: Vec<ConvergenceWarning>,
    #[serde(skip)]
    pub abilities: Vec<f64>
}

impl PointEstimate {
    pub fn new(
        parameter_names: Vec<String>,
        constrained: Vec<f64>,
        num_players: usize,
        log_density: f64,
        iterations: usize,
        converged: bool,
        warnings: Vec<ConvergenceWarning>
    ) -> Result<PointEstimate, ModelError> {
        if constrained.len() < num_players || parameter_names.len() != constrained.len() {
            return Err(ModelError::DimensionMismatch {
                expected: parameter_names.len().max(num_players),
                actual: constrained.len()
            });
        }
        let abilities = constrained[..num_players].to_vec();
        let ranked = point_ranking(&abilities).into_iter().map(|p| p + 1).collect();
        let ranking = ranks(&abilities);

        Ok(PointEstimate {
            estimates: parameter_names.into_iter().zip(constrained).collect(),
            ranked,
            ranking,
            log_density,
            iterations,
            converged,
            warnings,
            abilities
        })
    }
}
