use approx::assert_abs_diff_eq;
use bt_processor::model::{
    likelihood::{inv_logit, win_probability, Comparisons},
    ranking::{point_ranking, ranks, RankDistribution}
};
use bt_processor::utils::test_utils::generate_abilities;
use itertools::Itertools;

use crate::common::{init_test_env, recovery_dataset, small_dataset};

#[test]
fn test_win_probabilities_are_complementary() {
    init_test_env();
    let abilities = generate_abilities(12, 2.0);

    for (i, j) in (0..12).tuple_combinations() {
        let forward = win_probability(&abilities, i, j).unwrap();
        let backward = win_probability(&abilities, j, i).unwrap();

        assert_abs_diff_eq!(forward + backward, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(forward, inv_logit(abilities[i] - abilities[j]), epsilon = 1e-9);
    }
}

#[test]
fn test_global_shift_changes_nothing_observable() {
    init_test_env();
    let (abilities, matches) = recovery_dataset();

    for c in [-50.0, -1.5, 0.25, 300.0] {
        let shifted: Vec<f64> = abilities.iter().map(|a| a + c).collect();

        assert_abs_diff_eq!(
            matches.log_likelihood(&abilities).unwrap(),
            matches.log_likelihood(&shifted).unwrap(),
            epsilon = 1e-8
        );
        assert_abs_diff_eq!(
            win_probability(&abilities, 3, 7).unwrap(),
            win_probability(&shifted, 3, 7).unwrap(),
            epsilon = 1e-9
        );
        assert_eq!(point_ranking(&abilities), point_ranking(&shifted));
        assert_eq!(ranks(&abilities), ranks(&shifted));
    }
}

#[test]
fn test_ranking_is_a_permutation() {
    let abilities = generate_abilities(30, 1.0);

    let ranking = point_ranking(&abilities);
    assert_eq!(ranking.iter().copied().sorted().collect::<Vec<_>>(), (0..30).collect::<Vec<_>>());
    assert!(ranking.windows(2).all(|w| abilities[w[0]] >= abilities[w[1]]));

    let rank = ranks(&abilities);
    assert_eq!(rank.iter().copied().sorted().collect::<Vec<_>>(), (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_extreme_gaps_stay_finite() {
    init_test_env();
    let matches = small_dataset();
    let abilities: Vec<f64> = (0..matches.num_players()).map(|k| if k % 2 == 0 { 400.0 } else { -400.0 }).collect();

    let mut gradient = vec![0.0; matches.num_players()];
    let value = matches.log_likelihood_gradient(&abilities, &mut gradient).unwrap();

    assert!(value.is_finite());
    assert!(value < 0.0);
    assert!(gradient.iter().all(|g| g.is_finite()));
}

#[test]
fn test_rank_distribution_rows_sum_to_one() {
    let draws: Vec<Vec<f64>> = (0..25).map(|seed| generate_abilities(6, 1.0 + seed as f64)).collect();

    let distribution = RankDistribution::from_draws(6, &draws).unwrap();

    assert_eq!(distribution.draws(), 25);
    for player in 0..6 {
        let total: f64 = (1..=6).map(|rank| distribution.probability(player, rank)).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
    }
    assert!(RankDistribution::from_draws(5, &draws).is_err());
}
