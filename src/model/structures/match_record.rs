use crate::error::ModelError;

/// A single head-to-head result. Player indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub player0: usize,
    pub player1: usize,
    /// `y = 1` in the dataset schema
    pub player1_won: bool
}

/// Validated set of head-to-head matches between `num_players` players.
///
/// Matches are independent and exchangeable; the same pairing may appear
/// any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSet {
    num_players: usize,
    matches: Vec<Match>
}

impl MatchSet {
    pub fn new(num_players: usize, matches: Vec<Match>) -> Result<MatchSet, ModelError> {
        for (match_index, m) in matches.iter().enumerate() {
            for index in [m.player0, m.player1] {
                if index >= num_players {
                    return Err(ModelError::PlayerOutOfRange {
                        index: index + 1,
                        players: num_players
                    });
                }
            }

            if m.player0 == m.player1 {
                return Err(ModelError::SelfMatch {
                    match_index,
                    player: m.player0 + 1
                });
            }
        }

        Ok(MatchSet { num_players, matches })
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
