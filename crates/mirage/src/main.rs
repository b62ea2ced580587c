//! Mirage command-line interface.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mirage::{
    CrimeScenario, DetectiveProfile, MarkdownAssembler, MetricsCalculator, MirageConfig,
    OutputFormat, StoryAssembler, StoryPipeline,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mirage", version, about = "Dual-layer mystery story generation")]
struct Cli {
    /// Path to a TOML config file (defaults plus MIRAGE_* env overrides)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a story from a crime scenario
    Run {
        /// Scenario TOML file; omit to use the embedded sample
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write the transcript here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Generate this many independent stories and report their metrics
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Validate a scenario file and report every problem found
    Validate {
        /// Scenario TOML file
        scenario: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = MirageConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Run {
            scenario,
            seed,
            out,
            count,
        } => run(config, scenario, seed, out, count).await,
        Commands::Validate { scenario } => validate(&scenario),
    }
}

async fn run(
    mut config: MirageConfig,
    scenario_path: Option<PathBuf>,
    seed: Option<u64>,
    out: Option<PathBuf>,
    count: usize,
) -> anyhow::Result<()> {
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let scenario = match &scenario_path {
        Some(path) => CrimeScenario::load(path).context("loading scenario")?,
        None => mirage::harrowgate().context("loading embedded sample scenario")?,
    };
    let profile = DetectiveProfile::default();
    let format = config.output.format;
    let pipeline = StoryPipeline::new(config);

    if count > 1 {
        let results = pipeline.generate_batch(scenario, count).await;
        let calculator = MetricsCalculator::new();
        let mut reports = Vec::new();
        for result in results {
            let story = result.context("generating batch story")?;
            reports.push(calculator.calculate(story.plot_points(), story.paths(), &[]));
        }
        let rendered = serde_json::to_string_pretty(&reports)?;
        emit(out.as_deref(), &rendered)?;
        return Ok(());
    }

    let story = pipeline
        .generate(scenario.clone(), profile.clone())
        .await
        .context("generating story")?;

    let metrics = MetricsCalculator::new().calculate(story.plot_points(), story.paths(), &[]);
    tracing::info!(
        plot_points = metrics.num_plot_points,
        interventions = metrics.num_interventions,
        trend = %metrics.suspense_trend,
        open_paths = metrics.final_open_paths,
        "Story generated"
    );

    let rendered = match format {
        OutputFormat::Markdown => {
            MarkdownAssembler::new()
                .assemble(&scenario, &profile, &story)
                .await?
        }
        OutputFormat::Json => serde_json::to_string_pretty(&story)?,
    };
    emit(out.as_deref(), &rendered)
}

fn validate(path: &std::path::Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let scenario = CrimeScenario::from_toml_str(&text).context("parsing scenario")?;

    let validation = scenario.validate();
    for warning in &validation.warnings {
        eprintln!("Warning: {}", warning);
    }
    if !validation.is_valid() {
        eprintln!("{}", validation.format_errors());
        anyhow::bail!(
            "{} error(s) in {}",
            validation.errors.len(),
            path.display()
        );
    }

    println!("{} is valid", path.display());
    Ok(())
}

fn emit(out: Option<&std::path::Path>, rendered: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "Transcript written");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
