use approx::assert_abs_diff_eq;
use bt_processor::model::{
    identifiability::IdentifiabilityReport,
    likelihood::{inv_logit, log_inv_logit, team_win_probability, win_probability, Comparisons},
    structures::{
        dataset::{Dataset, TeamData},
        team_match::{TeamMatch, TeamMatchSet}
    }
};

use crate::common::init_test_env;

fn single_team_match() -> TeamMatchSet {
    TeamMatchSet::new(
        4,
        2,
        vec![TeamMatch {
            team0: vec![0, 1],
            team1: vec![2, 3],
            team1_won: true
        }]
    )
    .unwrap()
}

#[test]
fn test_single_team_match_log_likelihood() {
    init_test_env();
    let matches = single_team_match();
    let abilities = [0.3, -0.2, 0.5, 0.1];

    let expected = inv_logit((0.5 + 0.1) - (0.3 - 0.2)).ln();

    assert_abs_diff_eq!(matches.log_likelihood(&abilities).unwrap(), expected, epsilon = 1e-12);
    assert_abs_diff_eq!(
        matches.log_likelihood(&abilities).unwrap(),
        log_inv_logit(0.5),
        epsilon = 1e-12
    );
}

#[test]
fn test_single_member_teams_match_individual_formula() {
    let abilities = [1.2, -0.7, 0.4];

    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        assert_abs_diff_eq!(
            team_win_probability(&abilities, &[i], &[j]).unwrap(),
            win_probability(&abilities, i, j).unwrap(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_constant_lineup_leaves_a_flat_ridge() {
    init_test_env();
    let matches = TeamMatchSet::new(
        4,
        2,
        (0..20)
            .map(|n| TeamMatch {
                team0: vec![0, 1],
                team1: vec![2, 3],
                team1_won: n % 3 == 0
            })
            .collect()
    )
    .unwrap();
    let abilities = [0.4, -0.1, 0.2, 0.7];

    let report = IdentifiabilityReport::check(&matches);
    assert!(report.constant_team_composition);
    assert!(!report.is_identified());
    assert!(report.ensure_identified().is_err());

    // Moving ability between teammates does not change any team total
    let base = matches.log_likelihood(&abilities).unwrap();
    for c in [-3.0, 0.5, 10.0] {
        let moved = [abilities[0] + c, abilities[1] - c, abilities[2], abilities[3]];
        assert_abs_diff_eq!(matches.log_likelihood(&moved).unwrap(), base, epsilon = 1e-10);
    }
}

#[test]
fn test_team_dataset_from_json() {
    let json = r#"{"K": 4, "J": 2, "N": 1, "team0": [[1, 2]], "team1": [[3, 4]], "y": [1]}"#;

    let dataset: Dataset = serde_json::from_str(json).unwrap();
    let matches = match dataset {
        Dataset::Team(raw) => raw.validate().unwrap(),
        Dataset::Individual(_) => panic!("team data parsed as head-to-head")
    };

    assert_eq!(matches, single_team_match());
    assert_eq!(TeamData::from(&matches).team1, vec![vec![3, 4]]);
}

#[test]
fn test_overlapping_teams_are_rejected() {
    let json = r#"{"K": 4, "J": 2, "N": 1, "team0": [[1, 2]], "team1": [[2, 4]], "y": [0]}"#;

    let dataset: TeamData = serde_json::from_str(json).unwrap();

    assert!(dataset.validate().is_err());
}
