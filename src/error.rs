use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("player index {index} is out of range 1..={players}")]
    PlayerOutOfRange { index: usize, players: usize },

    #[error("`{field}` has length {actual}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize
    },

    #[error("outcome {value} of match {match_index} is not 0 or 1")]
    InvalidOutcome { match_index: usize, value: u8 },

    #[error("team size must be at least 1")]
    InvalidTeamSize,

    #[error("player {player} appears on both teams of match {match_index}")]
    TeamOverlap { match_index: usize, player: usize },

    #[error("player {player} appears twice on one team of match {match_index}")]
    DuplicateTeamMember { match_index: usize, player: usize },

    #[error("match {match_index} pairs player {player} against themselves")]
    SelfMatch { match_index: usize, player: usize },

    #[error("cannot draw {requested} distinct players from a pool of {available}")]
    NotEnoughPlayers { requested: usize, available: usize },

    #[error("scale must be positive and finite, got {0}")]
    NonPositiveScale(f64),

    #[error("parameter vector has length {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("log-density is not finite at the starting point")]
    NonFiniteDensity,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("data does not identify every ability: {0}")]
    NotIdentified(String)
}

/// Failures at the binary edge: files, JSON and the model itself.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError)
}
