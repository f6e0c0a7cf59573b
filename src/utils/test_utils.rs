use crate::model::{
    simulation::Simulator,
    structures::{match_record::MatchSet, team_match::TeamMatchSet}
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

const SEED: u64 = 42;

/// Seeded abilities drawn from Normal(0, scale), not centered.
pub fn generate_abilities(n: usize, scale: f64) -> Vec<f64> {
    if scale <= 0.0 {
        panic!("Ability scale must be positive");
    }

    // Initialize seeded RNG for reproducible results
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let normal = Normal::new(0.0, scale).unwrap();

    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

pub fn generate_match_set(players: usize, matches: usize) -> MatchSet {
    Simulator::new(SEED).individual(players, matches).unwrap().matches
}

pub fn generate_team_match_set(players: usize, team_size: usize, matches: usize) -> TeamMatchSet {
    Simulator::new(SEED)
        .team(players, team_size, matches, 1.0)
        .unwrap()
        .matches
}
