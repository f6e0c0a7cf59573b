use std::fmt;

use serde::Serialize;

/// A result that should not be trusted without inspection. Drivers attach these
/// to their output and log them; they never retry or discard results on their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvergenceWarning {
    NotConverged { iterations: usize, gradient_norm: f64 },
    HighRhat { parameter: String, rhat: f64 },
    LowEss { parameter: String, ess: f64 },
    Divergences { chain: usize, count: usize },
    /// Groups of players separated by wins; with a flat prior the reported
    /// maximum is wherever the optimizer stopped
    Unbounded { groups: usize }
}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceWarning::NotConverged {
                iterations,
                gradient_norm
            } => write!(
                f,
                "optimizer stopped after {} iterations with gradient norm {:.3e}",
                iterations, gradient_norm
            ),
            ConvergenceWarning::HighRhat { parameter, rhat } => {
                write!(f, "{} has R-hat {:.3}", parameter, rhat)
            }
            ConvergenceWarning::LowEss { parameter, ess } => {
                write!(f, "{} has effective sample size {:.1}", parameter, ess)
            }
            ConvergenceWarning::Divergences { chain, count } => {
                write!(f, "chain {} had {} divergent transitions", chain, count)
            }
            ConvergenceWarning::Unbounded { groups } => write!(
                f,
                "wins split the players into {} separated groups; the likelihood has no finite maximum",
                groups
            )
        }
    }
}
