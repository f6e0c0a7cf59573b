use serde::Serialize;

use crate::error::ModelError;

/// Player indices (0-based) from strongest to weakest.
///
/// Equal abilities keep ascending index order. Comparison uses the IEEE total
/// order, so NaN input is ranked rather than panicking.
pub fn point_ranking(abilities: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..abilities.len()).collect();
    // sort_by is stable: ties stay in index order
    order.sort_by(|&a, &b| abilities[b].total_cmp(&abilities[a]));

    order
}

/// Rank of each player, 1 = best: one more than the number of players with a
/// strictly greater ability, plus the number of equal players with a lower index.
pub fn ranks(abilities: &[f64]) -> Vec<usize> {
    let mut ranks = vec![0; abilities.len()];
    for (position, &player) in point_ranking(abilities).iter().enumerate() {
        ranks[player] = position + 1;
    }

    ranks
}

/// Ranks for every posterior draw (`draws × players`).
pub fn ranks_per_draw(num_players: usize, draws: &[Vec<f64>]) -> Result<Vec<Vec<usize>>, ModelError> {
    draws
        .iter()
        .map(|draw| {
            if draw.len() != num_players {
                return Err(ModelError::DimensionMismatch {
                    expected: num_players,
                    actual: draw.len()
                });
            }
            Ok(ranks(draw))
        })
        .collect()
}

/// Per-player distribution over ranks accumulated across posterior draws.
///
/// Under posterior uncertainty there is no single ranking; this table is the result.
#[derive(Debug, Clone, PartialEq)]
pub struct RankDistribution {
    draws: usize,
    /// counts[player][rank - 1]
    counts: Vec<Vec<usize>>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSummary {
    /// 1-based player index
    pub player: usize,
    pub mean_rank: f64,
    pub lower_rank: usize,
    pub upper_rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k_probability: Option<f64>
}

impl RankDistribution {
    pub fn from_draws(num_players: usize, draws: &[Vec<f64>]) -> Result<RankDistribution, ModelError> {
        RankDistribution::from_ranks(num_players, &ranks_per_draw(num_players, draws)?)
    }

    /// Builds the table from per-draw ranks; every row must hold one rank in
    /// `1..=num_players` per player.
    pub fn from_ranks(num_players: usize, rank_draws: &[Vec<usize>]) -> Result<RankDistribution, ModelError> {
        let mut counts = vec![vec![0; num_players]; num_players];
        for draw in rank_draws {
            if draw.len() != num_players {
                return Err(ModelError::DimensionMismatch {
                    expected: num_players,
                    actual: draw.len()
                });
            }
            for (player, &rank) in draw.iter().enumerate() {
                if rank == 0 || rank > num_players {
                    return Err(ModelError::InvalidConfig(format!(
                        "rank {} of player {} is outside 1..={}",
                        rank,
                        player + 1,
                        num_players
                    )));
                }
                counts[player][rank - 1] += 1;
            }
        }

        Ok(RankDistribution {
            draws: rank_draws.len(),
            counts
        })
    }

    pub fn num_players(&self) -> usize {
        self.counts.len()
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Posterior probability that `player` (0-based) holds `rank` (1-based).
    pub fn probability(&self, player: usize, rank: usize) -> f64 {
        if self.draws == 0 || rank == 0 || rank > self.num_players() {
            return 0.0;
        }

        self.counts[player][rank - 1] as f64 / self.draws as f64
    }

    pub fn mean_rank(&self, player: usize) -> f64 {
        if self.draws == 0 {
            return f64::NAN;
        }

        let weighted: usize = self.counts[player]
            .iter()
            .enumerate()
            .map(|(r, &count)| (r + 1) * count)
            .sum();

        weighted as f64 / self.draws as f64
    }

    /// Probability that `player` finishes within the best `k`.
    pub fn top_k_probability(&self, player: usize, k: usize) -> f64 {
        (1..=k.min(self.num_players()))
            .map(|rank| self.probability(player, rank))
            .sum()
    }

    /// Equal-tailed interval of ranks holding `level` of the draws.
    pub fn rank_interval(&self, player: usize, level: f64) -> (usize, usize) {
        let n = self.num_players();
        if self.draws == 0 || n == 0 {
            return (0, 0);
        }

        let tail = (1.0 - level) / 2.0 * self.draws as f64;
        let mut cumulative = 0.0;
        let mut lower = 1;
        let mut upper = n;
        let mut lower_found = false;

        for rank in 1..=n {
            cumulative += self.counts[player][rank - 1] as f64;
            if !lower_found && cumulative > tail {
                lower = rank;
                lower_found = true;
            }
            if cumulative >= self.draws as f64 - tail {
                upper = rank;
                break;
            }
        }

        (lower, upper.max(lower))
    }

    /// One entry per player, best mean rank first.
    pub fn summarize(&self, level: f64, top_k: usize) -> Vec<RankSummary> {
        let mut summaries: Vec<RankSummary> = (0..self.num_players())
            .map(|player| {
                let (lower_rank, upper_rank) = self.rank_interval(player, level);
                RankSummary {
                    player: player + 1,
                    mean_rank: self.mean_rank(player),
                    lower_rank,
                    upper_rank,
                    top_k_probability: (top_k > 0).then(|| self.top_k_probability(player, top_k))
                }
            })
            .collect();

        summaries.sort_by(|a, b| a.mean_rank.total_cmp(&b.mean_rank));
        summaries
    }
}
