use rand::{seq::index, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Bernoulli, Distribution, Normal};
use tracing::{debug, info};

use crate::{
    error::ModelError,
    model::{
        ability::center,
        constants::DEFAULT_ABILITY_SCALE,
        likelihood::{team_win_probability, win_probability},
        structures::{
            match_record::{Match, MatchSet},
            team_match::{TeamMatch, TeamMatchSet}
        }
    }
};

/// Ground-truth abilities together with the matches generated from them.
#[derive(Debug, Clone)]
pub struct Simulation<M> {
    pub abilities: Vec<f64>,
    pub matches: M
}

/// Seeded generator of synthetic datasets. The same seed always yields the same output.
pub struct Simulator {
    rng: ChaCha8Rng
}

impl Simulator {
    pub fn new(seed: u64) -> Simulator {
        Simulator {
            rng: ChaCha8Rng::seed_from_u64(seed)
        }
    }

    /// Draws `players` abilities i.i.d. `Normal(0, scale)` and centers them to sum to zero.
    pub fn abilities(&mut self, players: usize, scale: f64) -> Result<Vec<f64>, ModelError> {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(ModelError::NonPositiveScale(scale));
        }
        let normal = Normal::new(0.0, scale).map_err(|_| ModelError::NonPositiveScale(scale))?;

        let mut abilities: Vec<f64> = (0..players).map(|_| normal.sample(&mut self.rng)).collect();
        center(&mut abilities);

        Ok(abilities)
    }

    /// Head-to-head matches between two distinct, uniformly chosen players,
    /// with true abilities drawn from Normal(0, 1).
    ///
    /// Nothing guarantees that every player appears in some match.
    pub fn individual(&mut self, players: usize, matches: usize) -> Result<Simulation<MatchSet>, ModelError> {
        self.individual_scaled(players, matches, DEFAULT_ABILITY_SCALE)
    }

    pub fn individual_scaled(
        &mut self,
        players: usize,
        matches: usize,
        scale: f64
    ) -> Result<Simulation<MatchSet>, ModelError> {
        info!("Simulating {} matches between {} players", matches, players);

        if matches > 0 && players < 2 {
            return Err(ModelError::NotEnoughPlayers {
                requested: 2,
                available: players
            });
        }

        let abilities = self.abilities(players, scale)?;
        let mut records = Vec::with_capacity(matches);

        for _ in 0..matches {
            let chosen = index::sample(&mut self.rng, players, 2);
            let (player0, player1) = (chosen.index(0), chosen.index(1));

            let p = win_probability(&abilities, player1, player0)?;
            let player1_won = self.bernoulli(p)?;

            records.push(Match {
                player0,
                player1,
                player1_won
            });
        }

        debug!("Simulated {} head-to-head matches", records.len());

        Ok(Simulation {
            matches: MatchSet::new(players, records)?,
            abilities
        })
    }

    /// Matches between two disjoint teams of `team_size` players each, drawn
    /// without replacement from the whole pool.
    pub fn team(
        &mut self,
        players: usize,
        team_size: usize,
        matches: usize,
        scale: f64
    ) -> Result<Simulation<TeamMatchSet>, ModelError> {
        info!(
            "Simulating {} matches of {} vs {} between {} players",
            matches, team_size, team_size, players
        );

        if team_size < 1 {
            return Err(ModelError::InvalidTeamSize);
        }
        if matches > 0 && 2 * team_size > players {
            return Err(ModelError::NotEnoughPlayers {
                requested: 2 * team_size,
                available: players
            });
        }

        let abilities = self.abilities(players, scale)?;
        let mut records = Vec::with_capacity(matches);

        for _ in 0..matches {
            let chosen = index::sample(&mut self.rng, players, 2 * team_size).into_vec();
            let (team0, team1) = chosen.split_at(team_size);

            let p = team_win_probability(&abilities, team1, team0)?;
            let team1_won = self.bernoulli(p)?;

            records.push(TeamMatch {
                team0: team0.to_vec(),
                team1: team1.to_vec(),
                team1_won
            });
        }

        debug!("Simulated {} team matches", records.len());

        Ok(Simulation {
            matches: TeamMatchSet::new(players, team_size, records)?,
            abilities
        })
    }

    fn bernoulli(&mut self, p: f64) -> Result<bool, ModelError> {
        let bernoulli =
            Bernoulli::new(p).map_err(|_| ModelError::InvalidConfig(format!("win probability {} is not in [0, 1]", p)))?;

        Ok(bernoulli.sample(&mut self.rng))
    }
}
