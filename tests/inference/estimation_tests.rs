use approx::assert_abs_diff_eq;
use bt_processor::{
    inference::{estimate, ConvergenceWarning, GradientAscent},
    model::{
        ability::AbilityPrior,
        evaluation::correlation,
        structures::{match_record::{Match, MatchSet}, prior_kind::PriorKind}
    }
};

use crate::common::{init_test_env, recovery_dataset};

fn one_match() -> MatchSet {
    MatchSet::new(
        2,
        vec![Match {
            player0: 0,
            player1: 1,
            player1_won: true
        }]
    )
    .unwrap()
}

fn with_tolerance(tolerance: f64) -> GradientAscent {
    GradientAscent {
        tolerance,
        ..GradientAscent::default()
    }
}

#[test]
fn test_maximum_likelihood_recovers_abilities() {
    init_test_env();
    let (truth, matches) = recovery_dataset();

    let fit = estimate(&matches, AbilityPrior::Flat, &GradientAscent::default()).unwrap();

    assert!(fit.converged);
    assert!(!fit
        .warnings
        .iter()
        .any(|w| matches!(w, ConvergenceWarning::Unbounded { .. })));
    assert_eq!(fit.abilities.len(), 50);
    let r = correlation(&fit.abilities, &truth).unwrap();
    assert!(r > 0.9, "correlation with true abilities was {}", r);
}

#[test]
fn test_normal_prior_recovers_abilities() {
    init_test_env();
    let (truth, matches) = recovery_dataset();

    let fit = estimate(&matches, AbilityPrior::from(PriorKind::Normal), &GradientAscent::default()).unwrap();

    assert!(fit.converged);
    assert!(correlation(&fit.abilities, &truth).unwrap() > 0.9);
    assert_eq!(fit.ranked.len(), 50);
}

#[test]
fn test_hierarchical_estimate_reports_sigma() {
    init_test_env();
    let (_, matches) = recovery_dataset();

    let fit = estimate(&matches, AbilityPrior::from(PriorKind::Hierarchical), &GradientAscent::default()).unwrap();

    let names: Vec<&String> = fit.estimates.keys().collect();
    assert_eq!(names.len(), 51);
    assert_eq!(names.first().map(|s| s.as_str()), Some("alpha[1]"));
    assert_eq!(names.last().map(|s| s.as_str()), Some("sigma"));

    let sigma = fit.estimates["sigma"];
    assert!(sigma > 0.0 && sigma.is_finite(), "sigma estimate was {}", sigma);
    assert_eq!(fit.converged, fit.warnings.is_empty());
}

#[test]
fn test_single_match_without_prior_diverges() {
    init_test_env();
    let matches = one_match();

    let loose = estimate(&matches, AbilityPrior::Flat, &with_tolerance(1e-4)).unwrap();
    let tight = estimate(&matches, AbilityPrior::Flat, &with_tolerance(1e-8)).unwrap();

    let loose_gap = loose.abilities[1] - loose.abilities[0];
    let tight_gap = tight.abilities[1] - tight.abilities[0];

    // The optimum is at infinity: the gap only stops where the tolerance allows
    assert!(loose_gap > 9.0, "gap at 1e-4 was {}", loose_gap);
    assert!(tight_gap > 18.0, "gap at 1e-8 was {}", tight_gap);
    assert!(tight_gap > loose_gap);

    // Stopping on a small gradient is not convergence here, so the fit says so
    for fit in [&loose, &tight] {
        assert!(fit
            .warnings
            .iter()
            .any(|w| matches!(w, ConvergenceWarning::Unbounded { groups: 2 })));
    }
}

#[test]
fn test_single_match_with_normal_prior_is_finite() {
    init_test_env();
    let matches = one_match();

    let fit = estimate(&matches, AbilityPrior::from(PriorKind::Normal), &GradientAscent::default()).unwrap();

    assert!(fit.converged);
    assert!(fit.warnings.is_empty());
    let gap = fit.abilities[1] - fit.abilities[0];
    assert!(gap > 0.0 && gap < 2.0, "gap was {}", gap);
    // The two modes are mirror images around zero
    assert_abs_diff_eq!(fit.abilities[0], -fit.abilities[1], epsilon = 1e-6);
    assert_eq!(fit.ranked, vec![2, 1]);
}

#[test]
fn test_iteration_cap_is_reported() {
    init_test_env();
    let (_, matches) = recovery_dataset();
    let optimizer = GradientAscent {
        max_iterations: 2,
        ..GradientAscent::default()
    };

    let fit = estimate(&matches, AbilityPrior::Flat, &optimizer).unwrap();

    assert!(!fit.converged);
    assert_eq!(fit.warnings.len(), 1);
    assert_eq!(fit.iterations, 2);
}
