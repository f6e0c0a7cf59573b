//! The Bradley-Terry model: abilities and their priors, the match likelihood,
//! synthetic data, and rankings derived from ability values.

pub mod ability;
pub mod constants;
pub mod evaluation;
pub mod identifiability;
pub mod likelihood;
pub mod ranking;
pub mod simulation;
pub mod structures;
