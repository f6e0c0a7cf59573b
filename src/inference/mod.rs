pub mod diagnostics;
pub mod optimizer;
pub mod posterior;
pub mod sampler;
pub mod summary;
pub mod warning;

use tracing::{info, warn};

use crate::{
    error::ModelError,
    model::{ability::AbilityPrior, identifiability::IdentifiabilityReport, likelihood::Comparisons, ranking::RankDistribution}
};
pub use optimizer::{GradientAscent, OptimizationResult};
pub use posterior::LogPosterior;
pub use sampler::{HamiltonianSampler, PosteriorDraws};
pub use summary::{PointEstimate, PosteriorSummary};
pub use warning::ConvergenceWarning;

/// A differentiable log-density over unconstrained parameters.
///
/// Drivers share one instance across worker threads, so implementations must
/// not mutate themselves during evaluation.
pub trait LogDensity: Sync {
    fn dim(&self) -> usize;

    fn parameter_names(&self) -> Vec<String>;

    fn log_density(&self, theta: &[f64]) -> Result<f64, ModelError>;

    /// Writes the gradient into `gradient` and returns the log-density.
    fn log_density_gradient(&self, theta: &[f64], gradient: &mut [f64]) -> Result<f64, ModelError>;

    /// Maps unconstrained parameters back to the scale reported to users.
    fn constrain(&self, theta: &[f64]) -> Vec<f64> {
        theta.to_vec()
    }
}

#[derive(Debug, Clone)]
pub struct PosteriorFit {
    pub summary: PosteriorSummary,
    pub ranks: RankDistribution,
    pub draws: PosteriorDraws
}

/// Maximum of the log-posterior (plain MLE under the flat prior).
pub fn estimate<C: Comparisons + ?Sized>(
    data: &C,
    prior: AbilityPrior,
    optimizer: &GradientAscent
) -> Result<PointEstimate, ModelError> {
    let report = IdentifiabilityReport::check(data);
    report.log_warnings();
    let unbounded = matches!(prior, AbilityPrior::Flat) && report.complete_separation();

    let posterior = LogPosterior::new(data, prior);
    let result = optimizer.maximize(&posterior, &posterior.initial_point())?;

    let mut warnings: Vec<ConvergenceWarning> = result.warning.into_iter().collect();
    if unbounded {
        let warning = ConvergenceWarning::Unbounded {
            groups: report.win_components
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    PointEstimate::new(
        posterior.parameter_names(),
        posterior.constrain(&result.parameters),
        data.num_players(),
        result.log_density,
        result.iterations,
        result.converged,
        warnings
    )
}

/// Posterior draws, their summaries and the rank distribution across all draws.
pub fn sample_posterior<C: Comparisons + ?Sized>(
    data: &C,
    prior: AbilityPrior,
    sampler: &HamiltonianSampler
) -> Result<PosteriorFit, ModelError> {
    IdentifiabilityReport::check(data).log_warnings();

    let posterior = LogPosterior::new(data, prior);
    let draws = sampler.sample(&posterior)?;
    let summary = PosteriorSummary::from_draws(&draws);

    let num_players = data.num_players();
    let ranks = RankDistribution::from_draws(num_players, &draws.leading_draws(num_players))?;

    info!(
        "Collected {} draws with {} divergent transitions and {} warnings",
        draws.total_draws(),
        summary.divergences,
        summary.warnings.len()
    );

    Ok(PosteriorFit { summary, ranks, draws })
}
