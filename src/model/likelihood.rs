use std::slice;

use crate::{
    error::ModelError,
    model::structures::{match_record::MatchSet, team_match::TeamMatchSet}
};

/// Inverse logit, evaluated on whichever branch keeps `exp` from overflowing.
pub fn inv_logit(v: f64) -> f64 {
    if v >= 0.0 {
        1.0 / (1.0 + (-v).exp())
    } else {
        let e = v.exp();
        e / (1.0 + e)
    }
}

/// `ln(inv_logit(v))` computed from the log-odds directly.
///
/// The probability is never formed, so the result stays finite for any finite `v`
/// instead of collapsing to `ln(0)` once `inv_logit(v)` underflows.
pub fn log_inv_logit(v: f64) -> f64 {
    if v >= 0.0 {
        -(-v).exp().ln_1p()
    } else {
        v - v.exp().ln_1p()
    }
}

/// Bernoulli log-probability of `won` on the logit scale.
pub fn bernoulli_logit_log_probability(won: bool, log_odds: f64) -> f64 {
    if won {
        log_inv_logit(log_odds)
    } else {
        log_inv_logit(-log_odds)
    }
}

/// Probability that `player` beats `opponent`.
pub fn win_probability(abilities: &[f64], player: usize, opponent: usize) -> Result<f64, ModelError> {
    team_win_probability(abilities, slice::from_ref(&player), slice::from_ref(&opponent))
}

/// Probability that `team` beats `opponents`; a team's ability is the sum of its members'.
pub fn team_win_probability(abilities: &[f64], team: &[usize], opponents: &[usize]) -> Result<f64, ModelError> {
    let log_odds = team_ability(abilities, team)? - team_ability(abilities, opponents)?;

    Ok(inv_logit(log_odds))
}

fn team_ability(abilities: &[f64], team: &[usize]) -> Result<f64, ModelError> {
    team.iter()
        .map(|&p| {
            abilities.get(p).copied().ok_or(ModelError::PlayerOutOfRange {
                index: p + 1,
                players: abilities.len()
            })
        })
        .sum()
}

/// Observed paired comparisons: each match sets side 1 against side 0 and the
/// log-odds of side 1 winning is the ability sum of side 1 minus that of side 0.
///
/// Implementations hold only immutable data, so the provided evaluations are
/// pure functions of the ability vector and safe to call from many threads.
pub trait Comparisons: Sync {
    fn num_players(&self) -> usize;

    fn num_matches(&self) -> usize;

    /// Players on side 0 and side 1 of match `n`.
    fn sides(&self, n: usize) -> (&[usize], &[usize]);

    fn side1_won(&self, n: usize) -> bool;

    fn log_odds(&self, abilities: &[f64], n: usize) -> f64 {
        let (side0, side1) = self.sides(n);
        let sum = |side: &[usize]| side.iter().map(|&p| abilities[p]).sum::<f64>();

        sum(side1) - sum(side0)
    }

    fn match_log_likelihood(&self, abilities: &[f64], n: usize) -> f64 {
        bernoulli_logit_log_probability(self.side1_won(n), self.log_odds(abilities, n))
    }

    /// Sum of per-match log-likelihoods, accumulated in match order.
    fn log_likelihood(&self, abilities: &[f64]) -> Result<f64, ModelError> {
        self.check_abilities(abilities)?;

        Ok((0..self.num_matches())
            .map(|n| self.match_log_likelihood(abilities, n))
            .sum())
    }

    /// Returns the log-likelihood and adds its gradient with respect to the
    /// abilities into `gradient`.
    fn log_likelihood_gradient(&self, abilities: &[f64], gradient: &mut [f64]) -> Result<f64, ModelError> {
        self.check_abilities(abilities)?;
        if gradient.len() < abilities.len() {
            return Err(ModelError::DimensionMismatch {
                expected: abilities.len(),
                actual: gradient.len()
            });
        }

        let mut total = 0.0;
        for n in 0..self.num_matches() {
            let v = self.log_odds(abilities, n);
            let won = self.side1_won(n);
            total += bernoulli_logit_log_probability(won, v);

            // d/dv of the Bernoulli-logit log-probability
            let residual = if won { 1.0 } else { 0.0 } - inv_logit(v);
            let (side0, side1) = self.sides(n);
            for &p in side1 {
                gradient[p] += residual;
            }
            for &p in side0 {
                gradient[p] -= residual;
            }
        }

        Ok(total)
    }

    fn check_abilities(&self, abilities: &[f64]) -> Result<(), ModelError> {
        if abilities.len() != self.num_players() {
            return Err(ModelError::DimensionMismatch {
                expected: self.num_players(),
                actual: abilities.len()
            });
        }

        Ok(())
    }
}

impl Comparisons for MatchSet {
    fn num_players(&self) -> usize {
        MatchSet::num_players(self)
    }

    fn num_matches(&self) -> usize {
        self.len()
    }

    fn sides(&self, n: usize) -> (&[usize], &[usize]) {
        let m = &self.matches()[n];
        (slice::from_ref(&m.player0), slice::from_ref(&m.player1))
    }

    fn side1_won(&self, n: usize) -> bool {
        self.matches()[n].player1_won
    }
}

impl Comparisons for TeamMatchSet {
    fn num_players(&self) -> usize {
        TeamMatchSet::num_players(self)
    }

    fn num_matches(&self) -> usize {
        self.len()
    }

    fn sides(&self, n: usize) -> (&[usize], &[usize]) {
        let m = &self.matches()[n];
        (&m.team0, &m.team1)
    }

    fn side1_won(&self, n: usize) -> bool {
        self.matches()[n].team1_won
    }
}
