use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Which population prior sits on the abilities during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PriorKind {
    /// No prior term: plain maximum likelihood
    Flat,
    /// alpha[k] ~ Normal(0, 1)
    Normal,
    /// sigma ~ LogNormal(0, 0.5), alpha[k] ~ Normal(0, sigma)
    Hierarchical
}
