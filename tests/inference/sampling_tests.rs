use approx::assert_abs_diff_eq;
use bt_processor::{
    inference::{sample_posterior, ConvergenceWarning, HamiltonianSampler},
    model::{
        ability::AbilityPrior,
        evaluation::correlation,
        simulation::Simulator,
        structures::{match_record::{Match, MatchSet}, prior_kind::PriorKind}
    }
};

use crate::common::init_test_env;

fn sampler(seed: u64) -> HamiltonianSampler {
    HamiltonianSampler {
        chains: 4,
        warmup: 400,
        draws: 500,
        seed,
        ..HamiltonianSampler::default()
    }
}

#[test]
fn test_hierarchical_posterior_recovers_abilities() {
    init_test_env();
    let simulation = Simulator::new(7).individual(12, 600).unwrap();

    let fit = sample_posterior(&simulation.matches, AbilityPrior::from(PriorKind::Hierarchical), &sampler(1)).unwrap();

    let means = fit.summary.mean_abilities(12);
    let r = correlation(&means, &simulation.abilities).unwrap();
    assert!(r > 0.8, "correlation of posterior means was {}", r);

    let sigma = &fit.summary.parameters["sigma"];
    assert!(sigma.mean > 0.0);
    assert!(sigma.q05 <= sigma.q50 && sigma.q50 <= sigma.q95);

    for (name, parameter) in fit.summary.parameters.iter().take(12) {
        assert!(parameter.rhat < 1.1, "{} has R-hat {}", name, parameter.rhat);
    }
}

#[test]
fn test_rank_distribution_covers_every_draw() {
    init_test_env();
    let simulation = Simulator::new(8).individual(6, 300).unwrap();

    let fit = sample_posterior(&simulation.matches, AbilityPrior::from(PriorKind::Normal), &sampler(2)).unwrap();

    assert_eq!(fit.ranks.draws(), 4 * 500);
    assert_eq!(fit.ranks.num_players(), 6);
    for player in 0..6 {
        let total: f64 = (1..=6).map(|rank| fit.ranks.probability(player, rank)).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.ranks.top_k_probability(player, 6), 1.0, epsilon = 1e-9);
    }

    let summaries = fit.ranks.summarize(0.9, 2);
    assert!(summaries.windows(2).all(|w| w[0].mean_rank <= w[1].mean_rank));
    assert!(summaries.iter().all(|s| s.lower_rank <= s.upper_rank));
}

#[test]
fn test_single_match_posterior_mean_gap_is_positive() {
    init_test_env();
    let matches = MatchSet::new(
        2,
        vec![Match {
            player0: 0,
            player1: 1,
            player1_won: true
        }]
    )
    .unwrap();

    let fit = sample_posterior(&matches, AbilityPrior::from(PriorKind::Normal), &sampler(3)).unwrap();

    let means = fit.summary.mean_abilities(2);
    let gap = means[1] - means[0];
    assert!(gap > 0.0 && gap.is_finite(), "posterior mean gap was {}", gap);
}

#[test]
fn test_fixed_seed_reproduces_draws() {
    init_test_env();
    let simulation = Simulator::new(9).individual(5, 100).unwrap();
    let small = HamiltonianSampler {
        chains: 3,
        warmup: 100,
        draws: 100,
        seed: 11,
        ..HamiltonianSampler::default()
    };

    let a = sample_posterior(&simulation.matches, AbilityPrior::from(PriorKind::Hierarchical), &small).unwrap();
    let b = sample_posterior(&simulation.matches, AbilityPrior::from(PriorKind::Hierarchical), &small).unwrap();

    for (chain_a, chain_b) in a.draws.chains.iter().zip(&b.draws.chains) {
        assert_eq!(chain_a.draws, chain_b.draws);
    }
    assert_eq!(a.ranks, b.ranks);
}

#[test]
fn test_too_few_draws_are_flagged() {
    init_test_env();
    let simulation = Simulator::new(10).individual(4, 60).unwrap();
    let short = HamiltonianSampler {
        chains: 2,
        warmup: 20,
        draws: 3,
        seed: 4,
        ..HamiltonianSampler::default()
    };

    let fit = sample_posterior(&simulation.matches, AbilityPrior::from(PriorKind::Normal), &short).unwrap();

    let rhat = fit.summary.parameters["alpha[1]"].rhat;
    assert!(rhat.is_nan(), "R-hat from three draws was {}", rhat);
    assert!(fit
        .summary
        .warnings
        .iter()
        .any(|w| matches!(w, ConvergenceWarning::HighRhat { parameter, .. } if parameter == "alpha[1]")));
    assert!(fit
        .summary
        .warnings
        .iter()
        .any(|w| matches!(w, ConvergenceWarning::LowEss { parameter, .. } if parameter == "alpha[1]")));
}
