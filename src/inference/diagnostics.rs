//! Convergence diagnostics for multi-chain MCMC output.
//!
//! Both statistics work on split chains: every chain is cut in half so that a
//! chain drifting within itself shows up as disagreement between its halves.

use statrs::statistics::Statistics;

/// Split potential scale reduction factor. Close to 1.0 when the chains agree.
///
/// Returns NaN when there are fewer than four draws per chain.
pub fn split_rhat(chains: &[Vec<f64>]) -> f64 {
    let halves = split_chains(chains);
    if halves.len() < 2 || halves[0].len() < 2 {
        return f64::NAN;
    }

    let n = halves[0].len() as f64;
    let means: Vec<f64> = halves.iter().map(|c| c.iter().mean()).collect();
    let within = halves.iter().map(|c| c.iter().variance()).mean();
    let between = n * means.iter().variance();

    if within == 0.0 {
        return if between == 0.0 { 1.0 } else { f64::INFINITY };
    }

    let pooled = (n - 1.0) / n * within + between / n;
    (pooled / within).sqrt()
}

/// Multi-chain effective sample size using Geyer's initial monotone sequence
/// over the combined autocorrelation of the split chains.
///
/// Returns NaN when there are fewer than four draws per chain or every draw is identical.
pub fn effective_sample_size(chains: &[Vec<f64>]) -> f64 {
    let halves = split_chains(chains);
    if halves.len() < 2 || halves[0].len() < 2 {
        return f64::NAN;
    }

    let m = halves.len() as f64;
    let n = halves[0].len();
    let nf = n as f64;

    let means: Vec<f64> = halves.iter().map(|c| c.iter().mean()).collect();
    let autocovariance = |lag: usize| -> f64 {
        halves
            .iter()
            .zip(&means)
            .map(|(chain, mean)| {
                (0..n - lag)
                    .map(|i| (chain[i] - mean) * (chain[i + lag] - mean))
                    .sum::<f64>()
                    / nf
            })
            .mean()
    };

    let within = autocovariance(0) * nf / (nf - 1.0);
    let pooled = within * (nf - 1.0) / nf + means.iter().variance();
    if pooled <= 0.0 || !pooled.is_finite() {
        return f64::NAN;
    }

    let rho = |lag: usize| 1.0 - (within - autocovariance(lag)) / pooled;

    let mut pair_sum = 0.0;
    let mut previous_pair = f64::INFINITY;
    let mut lag = 0;
    while lag + 1 < n {
        let pair = rho(lag) + rho(lag + 1);
        if pair <= 0.0 {
            break;
        }
        let pair = pair.min(previous_pair);
        pair_sum += pair;
        previous_pair = pair;
        lag += 2;
    }

    let total = m * nf;
    let tau = (-1.0 + 2.0 * pair_sum).max(1.0 / total.log10());

    total / tau
}

fn split_chains(chains: &[Vec<f64>]) -> Vec<&[f64]> {
    let n = chains.iter().map(|c| c.len()).min().unwrap_or(0);
    let half = n / 2;
    if half == 0 {
        return Vec::new();
    }

    chains
        .iter()
        .flat_map(|c| [&c[..half], &c[n - half..n]])
        .collect()
}
