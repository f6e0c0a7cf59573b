use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::model::{
    constants::{
        CHAINS, DEFAULT_ABILITY_SCALE, DEFAULT_SEED, DRAWS, GRADIENT_TOLERANCE, LEAPFROG_STEPS, MAX_ITERATIONS, WARMUP
    },
    structures::prior_kind::PriorKind
};

#[derive(Parser, Clone)]
#[command(
    display_name = "Bradley-Terry Processor",
    long_about = "Simulates paired-comparison data and fits Bradley-Terry ability models to it"
)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        global = true,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Generate a seeded synthetic dataset
    Simulate(SimulateArgs),
    /// Point estimate of the abilities (maximum likelihood or posterior mode)
    Fit(FitArgs),
    /// Draw from the posterior and summarize abilities and ranks
    Sample(SampleArgs)
}

#[derive(ClapArgs, Clone)]
pub struct SimulateArgs {
    #[arg(short = 'k', long)]
    pub players: usize,

    #[arg(short = 'n', long)]
    pub matches: usize,

    /// Players per side. Omit for head-to-head matches
    #[arg(short = 'j', long)]
    pub team_size: Option<usize>,

    /// Standard deviation of the true abilities
    #[arg(long, default_value_t = DEFAULT_ABILITY_SCALE)]
    pub scale: f64,

    #[arg(short, long, env = "BT_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Where to write the dataset as JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Where to write the true abilities as JSON
    #[arg(short, long)]
    pub truth: Option<PathBuf>
}

#[derive(ClapArgs, Clone)]
pub struct FitArgs {
    /// Dataset in JSON, head-to-head or team format
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = PriorKind::Normal)]
    pub prior: PriorKind,

    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Stop once every gradient component is below this value
    #[arg(long, default_value_t = GRADIENT_TOLERANCE)]
    pub tolerance: f64,

    /// True abilities (JSON array) to correlate the estimates against
    #[arg(short, long)]
    pub truth: Option<PathBuf>,

    /// Refuse datasets in which some abilities cannot be identified
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub strict: bool
}

#[derive(ClapArgs, Clone)]
pub struct SampleArgs {
    /// Dataset in JSON, head-to-head or team format
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = PriorKind::Hierarchical)]
    pub prior: PriorKind,

    #[arg(long, default_value_t = CHAINS)]
    pub chains: usize,

    #[arg(long, default_value_t = WARMUP)]
    pub warmup: usize,

    #[arg(long, default_value_t = DRAWS)]
    pub draws: usize,

    #[arg(long, default_value_t = LEAPFROG_STEPS)]
    pub leapfrog_steps: usize,

    #[arg(short, long, env = "BT_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Report the probability of each player finishing in the top k
    #[arg(long, default_value_t = 0)]
    pub top_k: usize,

    /// Refuse datasets in which some abilities cannot be identified
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub strict: bool
}
