use serde::{Deserialize, Serialize};

use crate::{
    error::ModelError,
    model::structures::{
        match_record::{Match, MatchSet},
        team_match::{TeamMatch, TeamMatchSet}
    }
};

/// Head-to-head dataset as exchanged on disk. Player indices are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualData {
    #[serde(rename = "K")]
    pub players: usize,
    #[serde(rename = "N")]
    pub matches: usize,
    pub player0: Vec<usize>,
    pub player1: Vec<usize>,
    /// 1 when `player1` won
    pub y: Vec<u8>
}

/// Team dataset as exchanged on disk. `team0`/`team1` are N×J tables of 1-based indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamData {
    #[serde(rename = "K")]
    pub players: usize,
    #[serde(rename = "J")]
    pub team_size: usize,
    #[serde(rename = "N")]
    pub matches: usize,
    pub team0: Vec<Vec<usize>>,
    pub team1: Vec<Vec<usize>>,
    pub y: Vec<u8>
}

/// Either schema; team data is recognised by its `J` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dataset {
    Team(TeamData),
    Individual(IndividualData)
}

impl IndividualData {
    pub fn validate(&self) -> Result<MatchSet, ModelError> {
        check_length("player0", self.matches, self.player0.len())?;
        check_length("player1", self.matches, self.player1.len())?;
        check_length("y", self.matches, self.y.len())?;

        let mut matches = Vec::with_capacity(self.matches);
        for n in 0..self.matches {
            matches.push(Match {
                player0: to_index(self.player0[n], self.players)?,
                player1: to_index(self.player1[n], self.players)?,
                player1_won: to_outcome(n, self.y[n])?
            });
        }

        MatchSet::new(self.players, matches)
    }
}

impl From<&MatchSet> for IndividualData {
    fn from(set: &MatchSet) -> Self {
        IndividualData {
            players: set.num_players(),
            matches: set.len(),
            player0: set.matches().iter().map(|m| m.player0 + 1).collect(),
            player1: set.matches().iter().map(|m| m.player1 + 1).collect(),
            y: set.matches().iter().map(|m| u8::from(m.player1_won)).collect()
        }
    }
}

impl TeamData {
    pub fn validate(&self) -> Result<TeamMatchSet, ModelError> {
        if self.team_size < 1 {
            return Err(ModelError::InvalidTeamSize);
        }

        check_length("team0", self.matches, self.team0.len())?;
        check_length("team1", self.matches, self.team1.len())?;
        check_length("y", self.matches, self.y.len())?;

        let mut matches = Vec::with_capacity(self.matches);
        for n in 0..self.matches {
            matches.push(TeamMatch {
                team0: to_team(&self.team0[n], self.players)?,
                team1: to_team(&self.team1[n], self.players)?,
                team1_won: to_outcome(n, self.y[n])?
            });
        }

        TeamMatchSet::new(self.players, self.team_size, matches)
    }
}

impl From<&TeamMatchSet> for TeamData {
    fn from(set: &TeamMatchSet) -> Self {
        let one_based = |team: &[usize]| team.iter().map(|p| p + 1).collect::<Vec<usize>>();

        TeamData {
            players: set.num_players(),
            team_size: set.team_size(),
            matches: set.len(),
            team0: set.matches().iter().map(|m| one_based(&m.team0)).collect(),
            team1: set.matches().iter().map(|m| one_based(&m.team1)).collect(),
            y: set.matches().iter().map(|m| u8::from(m.team1_won)).collect()
        }
    }
}

fn check_length(field: &'static str, expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected != actual {
        return Err(ModelError::LengthMismatch { field, expected, actual });
    }

    Ok(())
}

fn to_index(player: usize, players: usize) -> Result<usize, ModelError> {
    if player == 0 || player > players {
        return Err(ModelError::PlayerOutOfRange { index: player, players });
    }

    Ok(player - 1)
}

fn to_team(team: &[usize], players: usize) -> Result<Vec<usize>, ModelError> {
    team.iter().map(|&p| to_index(p, players)).collect()
}

fn to_outcome(match_index: usize, value: u8) -> Result<bool, ModelError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(ModelError::InvalidOutcome { match_index, value })
    }
}
