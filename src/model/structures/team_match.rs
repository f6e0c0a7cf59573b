use std::collections::HashSet;

use crate::error::ModelError;

/// A match between two disjoint teams of equal size. Player indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMatch {
    pub team0: Vec<usize>,
    pub team1: Vec<usize>,
    pub team1_won: bool
}

/// Validated set of team matches, every team holding exactly `team_size` players.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMatchSet {
    num_players: usize,
    team_size: usize,
    matches: Vec<TeamMatch>
}

impl TeamMatchSet {
    pub fn new(num_players: usize, team_size: usize, matches: Vec<TeamMatch>) -> Result<TeamMatchSet, ModelError> {
        if team_size < 1 {
            return Err(ModelError::InvalidTeamSize);
        }

        for (match_index, m) in matches.iter().enumerate() {
            for (field, team) in [("team0", &m.team0), ("team1", &m.team1)] {
                if team.len() != team_size {
                    return Err(ModelError::LengthMismatch {
                        field,
                        expected: team_size,
                        actual: team.len()
                    });
                }
            }

            let mut seen_team0 = HashSet::with_capacity(team_size);
            for &player in &m.team0 {
                check_range(player, num_players)?;
                if !seen_team0.insert(player) {
                    return Err(ModelError::DuplicateTeamMember {
                        match_index,
                        player: player + 1
                    });
                }
            }

            let mut seen_team1 = HashSet::with_capacity(team_size);
            for &player in &m.team1 {
                check_range(player, num_players)?;
                if seen_team0.contains(&player) {
                    return Err(ModelError::TeamOverlap {
                        match_index,
                        player: player + 1
                    });
                }
                if !seen_team1.insert(player) {
                    return Err(ModelError::DuplicateTeamMember {
                        match_index,
                        player: player + 1
                    });
                }
            }
        }

        Ok(TeamMatchSet {
            num_players,
            team_size,
            matches
        })
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    pub fn matches(&self) -> &[TeamMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

fn check_range(player: usize, num_players: usize) -> Result<(), ModelError> {
    if player >= num_players {
        return Err(ModelError::PlayerOutOfRange {
            index: player + 1,
            players: num_players
        });
    }

    Ok(())
}
