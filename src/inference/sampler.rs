use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use tracing::{debug, info, info_span, Span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::{
    error::ModelError,
    inference::LogDensity,
    model::constants::{CHAINS, DIVERGENCE_THRESHOLD, DRAWS, INITIAL_RADIUS, LEAPFROG_STEPS, TARGET_ACCEPTANCE, WARMUP},
    utils::progress_utils::progress_style
};

const INITIAL_STEP_SIZE: f64 = 0.1;
const MAX_INITIALIZATION_ATTEMPTS: usize = 100;

/// Hamiltonian Monte Carlo with a fixed number of leapfrog steps per
/// transition. The step size is tuned during warmup by dual averaging and then
/// frozen; warmup draws are discarded.
///
/// Every chain owns a ChaCha8 stream derived from `(seed, chain)`, so the
/// draws do not depend on how rayon schedules the chains.
#[derive(Debug, Clone)]
pub struct HamiltonianSampler {
    pub chains: usize,
    pub warmup: usize,
    pub draws: usize,
    pub leapfrog_steps: usize,
    pub target_acceptance: f64,
    pub seed: u64
}

impl Default for HamiltonianSampler {
    fn default() -> Self {
        HamiltonianSampler {
            chains: CHAINS,
            warmup: WARMUP,
            draws: DRAWS,
            leapfrog_steps: LEAPFROG_STEPS,
            target_acceptance: TARGET_ACCEPTANCE,
            seed: 0
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChainOutput {
    /// Post-warmup draws on the constrained scale
    pub draws: Vec<Vec<f64>>,
    pub step_size: f64,
    pub divergences: usize,
    pub mean_acceptance: f64
}

/// Draws from every chain, keyed by parameter position in `parameter_names`.
#[derive(Debug, Clone)]
pub struct PosteriorDraws {
    pub parameter_names: Vec<String>,
    pub chains: Vec<ChainOutput>
}

impl PosteriorDraws {
    /// `chain × draw` values of a single parameter.
    pub fn parameter_chains(&self, parameter: usize) -> Vec<Vec<f64>> {
        self.chains
            .iter()
            .map(|chain| chain.draws.iter().map(|draw| draw[parameter]).collect())
            .collect()
    }

    /// The first `count` parameters of every draw, all chains pooled in chain order.
    pub fn leading_draws(&self, count: usize) -> Vec<Vec<f64>> {
        self.chains
            .iter()
            .flat_map(|chain| chain.draws.iter().map(|draw| draw[..count.min(draw.len())].to_vec()))
            .collect()
    }

    pub fn total_draws(&self) -> usize {
        self.chains.iter().map(|c| c.draws.len()).sum()
    }
}

impl HamiltonianSampler {
    pub fn sample<D: LogDensity + ?Sized>(&self, density: &D) -> Result<PosteriorDraws, ModelError> {
        self.validate()?;

        info!(
            "Sampling {} chains of {} warmup + {} draws over {} parameters",
            self.chains,
            self.warmup,
            self.draws,
            density.dim()
        );

        let span = info_span!("sample");
        span.pb_set_style(&progress_style());
        span.pb_set_length((self.chains * (self.warmup + self.draws)) as u64);
        let _entered = span.enter();

        let chains = (0..self.chains)
            .into_par_iter()
            .map(|chain| self.run_chain(density, chain, &span))
            .collect::<Result<Vec<ChainOutput>, ModelError>>()?;

        for (i, chain) in chains.iter().enumerate() {
            debug!(
                "Chain {}: step size {:.4}, mean acceptance {:.3}, {} divergences",
                i, chain.step_size, chain.mean_acceptance, chain.divergences
            );
        }

        Ok(PosteriorDraws {
            parameter_names: density.parameter_names(),
            chains
        })
    }

    fn run_chain<D: LogDensity + ?Sized>(&self, density: &D, chain: usize, span: &Span) -> Result<ChainOutput, ModelError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(chain as u64);

        let dim = density.dim();
        let mut position = vec![0.0; dim];
        let mut gradient = vec![0.0; dim];
        let mut log_density = f64::NEG_INFINITY;

        for _ in 0..MAX_INITIALIZATION_ATTEMPTS {
            for x in position.iter_mut() {
                *x = rng.random_range(-INITIAL_RADIUS..INITIAL_RADIUS);
            }
            log_density = density.log_density_gradient(&position, &mut gradient)?;
            if log_density.is_finite() && gradient.iter().all(|g| g.is_finite()) {
                break;
            }
        }
        if !log_density.is_finite() {
            return Err(ModelError::NonFiniteDensity);
        }

        let mut adaptation = DualAveraging::new(INITIAL_STEP_SIZE, self.target_acceptance);
        let mut step_size = INITIAL_STEP_SIZE;

        let mut proposal = vec![0.0; dim];
        let mut proposal_gradient = vec![0.0; dim];
        let mut momentum = vec![0.0; dim];

        let mut draws = Vec::with_capacity(self.draws);
        let mut divergences = 0;
        let mut acceptance_sum = 0.0;

        for iteration in 0..self.warmup + self.draws {
            let warming_up = iteration < self.warmup;
            let base_step = if warming_up { adaptation.step_size() } else { step_size };
            let epsilon = base_step * rng.random_range(0.9..1.1);

            for p in momentum.iter_mut() {
                *p = rng.sample(StandardNormal);
            }
            let initial_energy = -log_density + 0.5 * dot(&momentum, &momentum);

            proposal.copy_from_slice(&position);
            proposal_gradient.copy_from_slice(&gradient);
            let mut proposal_density = log_density;

            for _ in 0..self.leapfrog_steps {
                for i in 0..dim {
                    momentum[i] += 0.5 * epsilon * proposal_gradient[i];
                    proposal[i] += epsilon * momentum[i];
                }
                proposal_density = density.log_density_gradient(&proposal, &mut proposal_gradient)?;
                if !proposal_density.is_finite() {
                    break;
                }
                for i in 0..dim {
                    momentum[i] += 0.5 * epsilon * proposal_gradient[i];
                }
            }

            let energy = -proposal_density + 0.5 * dot(&momentum, &momentum);
            let energy_error = energy - initial_energy;
            let divergent = !energy.is_finite() || energy_error > DIVERGENCE_THRESHOLD;
            let acceptance = if divergent { 0.0 } else { (-energy_error).exp().min(1.0) };

            if rng.random::<f64>() < acceptance {
                std::mem::swap(&mut position, &mut proposal);
                std::mem::swap(&mut gradient, &mut proposal_gradient);
                log_density = proposal_density;
            }

            if warming_up {
                adaptation.update(acceptance);
                if iteration + 1 == self.warmup {
                    step_size = adaptation.final_step_size();
                }
            } else {
                if divergent {
                    divergences += 1;
                }
                acceptance_sum += acceptance;
                draws.push(density.constrain(&position));
            }

            span.pb_inc(1);
        }

        Ok(ChainOutput {
            mean_acceptance: acceptance_sum / self.draws as f64,
            draws,
            step_size,
            divergences
        })
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.chains == 0 || self.draws == 0 || self.leapfrog_steps == 0 {
            return Err(ModelError::InvalidConfig(
                "chains, draws and leapfrog steps must all be at least 1".to_string()
            ));
        }
        if !(self.target_acceptance > 0.0 && self.target_acceptance < 1.0) {
            return Err(ModelError::InvalidConfig(format!(
                "target acceptance must lie in (0, 1), got {}",
                self.target_acceptance
            )));
        }

        Ok(())
    }
}

/// Nesterov dual averaging of the log step size toward a target acceptance rate.
struct DualAveraging {
    target: f64,
    shrink_point: f64,
    error_average: f64,
    log_step: f64,
    log_step_average: f64,
    iterations: f64
}

impl DualAveraging {
    const GAMMA: f64 = 0.05;
    const T0: f64 = 10.0;
    const KAPPA: f64 = 0.75;

    fn new(initial_step_size: f64, target: f64) -> DualAveraging {
        DualAveraging {
            target,
            shrink_point: (10.0 * initial_step_size).ln(),
            error_average: 0.0,
            log_step: initial_step_size.ln(),
            log_step_average: 0.0,
            iterations: 0.0
        }
    }

    fn update(&mut self, acceptance: f64) {
        self.iterations += 1.0;
        let weight = 1.0 / (self.iterations + Self::T0);
        self.error_average = (1.0 - weight) * self.error_average + weight * (self.target - acceptance);
        self.log_step = self.shrink_point - self.iterations.sqrt() / Self::GAMMA * self.error_average;

        let eta = self.iterations.powf(-Self::KAPPA);
        self.log_step_average = eta * self.log_step + (1.0 - eta) * self.log_step_average;
    }

    fn step_size(&self) -> f64 {
        self.log_step.exp()
    }

    fn final_step_size(&self) -> f64 {
        self.log_step_average.exp()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
