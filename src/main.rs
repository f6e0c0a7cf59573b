use std::{fs, path::Path};

use bt_processor::{
    args::{Args, Command, FitArgs, SampleArgs, SimulateArgs},
    error::ProcessorError,
    inference::{estimate, sample_posterior, GradientAscent, HamiltonianSampler, PointEstimate, PosteriorSummary},
    model::{
        ability::AbilityPrior,
        constants::RANK_INTERVAL_LEVEL,
        evaluation::correlation,
        identifiability::IdentifiabilityReport,
        likelihood::Comparisons,
        ranking::RankSummary,
        simulation::Simulator,
        structures::dataset::{Dataset, IndividualData, TeamData}
    }
};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Serialize)]
struct FitOutput {
    #[serde(flatten)]
    estimate: PointEstimate,
    identifiability: IdentifiabilityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation: Option<f64>
}

#[derive(Serialize)]
struct SampleOutput {
    #[serde(flatten)]
    summary: PosteriorSummary,
    ranks: Vec<RankSummary>,
    identifiability: IdentifiabilityReport
}

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    let result = match &args.command {
        Command::Simulate(simulate) => run_simulate(simulate),
        Command::Fit(fit) => run_fit(fit),
        Command::Sample(sample) => run_sample(sample)
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run_simulate(args: &SimulateArgs) -> Result<(), ProcessorError> {
    let mut simulator = Simulator::new(args.seed);

    let (dataset, abilities) = match args.team_size {
        Some(team_size) => {
            let simulation = simulator.team(args.players, team_size, args.matches, args.scale)?;
            (Dataset::Team(TeamData::from(&simulation.matches)), simulation.abilities)
        }
        None => {
            let simulation = simulator.individual_scaled(args.players, args.matches, args.scale)?;
            (Dataset::Individual(IndividualData::from(&simulation.matches)), simulation.abilities)
        }
    };

    fs::write(&args.output, serde_json::to_string_pretty(&dataset)?)?;
    info!("Wrote dataset to {}", args.output.display());

    if let Some(path) = &args.truth {
        fs::write(path, serde_json::to_string_pretty(&abilities)?)?;
        info!("Wrote true abilities to {}", path.display());
    }

    Ok(())
}

fn run_fit(args: &FitArgs) -> Result<(), ProcessorError> {
    let output = match load_dataset(&args.input)? {
        Dataset::Individual(raw) => fit(&raw.validate()?, args)?,
        Dataset::Team(raw) => fit(&raw.validate()?, args)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn fit<C: Comparisons>(data: &C, args: &FitArgs) -> Result<FitOutput, ProcessorError> {
    let identifiability = check_identifiability(data, args.strict)?;

    let optimizer = GradientAscent {
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
        ..GradientAscent::default()
    };
    let estimate = estimate(data, AbilityPrior::from(args.prior), &optimizer)?;

    let correlation = match &args.truth {
        Some(path) => {
            let truth: Vec<f64> = serde_json::from_str(&fs::read_to_string(path)?)?;
            let r = correlation(&estimate.abilities, &truth)?;
            info!("Correlation with true abilities: {:.4}", r);
            Some(r)
        }
        None => None
    };

    Ok(FitOutput {
        estimate,
        identifiability,
        correlation
    })
}

fn run_sample(args: &SampleArgs) -> Result<(), ProcessorError> {
    let output = match load_dataset(&args.input)? {
        Dataset::Individual(raw) => sample(&raw.validate()?, args)?,
        Dataset::Team(raw) => sample(&raw.validate()?, args)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn sample<C: Comparisons>(data: &C, args: &SampleArgs) -> Result<SampleOutput, ProcessorError> {
    let identifiability = check_identifiability(data, args.strict)?;

    let sampler = HamiltonianSampler {
        chains: args.chains,
        warmup: args.warmup,
        draws: args.draws,
        leapfrog_steps: args.leapfrog_steps,
        seed: args.seed,
        ..HamiltonianSampler::default()
    };
    let fit = sample_posterior(data, AbilityPrior::from(args.prior), &sampler)?;

    Ok(SampleOutput {
        ranks: fit.ranks.summarize(RANK_INTERVAL_LEVEL, args.top_k),
        summary: fit.summary,
        identifiability
    })
}

fn check_identifiability<C: Comparisons>(data: &C, strict: bool) -> Result<IdentifiabilityReport, ProcessorError> {
    let report = IdentifiabilityReport::check(data);
    if strict {
        report.ensure_identified()?;
    }

    Ok(report)
}

fn load_dataset(path: &Path) -> Result<Dataset, ProcessorError> {
    info!("Loading dataset from {}", path.display());
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}
