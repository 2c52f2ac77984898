use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Month, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{load_table, ContactColor, Record, FULL_NAME};
use orchestrator::{
    publish_best_effort, write_processed_schedule, ArtifactWriter, CallListOrchestrator, GitPublisher,
    PipelineConfig, RunOutcome,
};
use pipeline::ProjectionMode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ranking::{bucket_of, StrategyKind, CALLED_PREFIX};
use schedule::{GameRecord, SchedulePreprocessor};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Call List - who to call next from a roster export
#[derive(Parser)]
#[command(name = "call-list")]
#[command(about = "Prioritize recruiting calls and tally schedule interest", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, classify and rank a roster export, then write the artifacts
    Run {
        /// Roster export
        #[arg(long, default_value = "data/export.csv")]
        input: PathBuf,

        /// Directory for top{N}.csv, top{N}.json, players.json and games.json
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// Game schedule, exported or already processed
        #[arg(long)]
        schedule: Option<PathBuf>,

        /// Also write the processed schedule here
        #[arg(long)]
        processed_schedule: Option<PathBuf>,

        /// JSON configuration file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// chronological, bucket_priority or random_far
        #[arg(long)]
        strategy: Option<StrategyKind>,

        /// Number of records to select
        #[arg(long)]
        limit: Option<usize>,

        /// Seed for random selection
        #[arg(long)]
        seed: Option<u64>,

        /// Size of the recent window in days
        #[arg(long)]
        recent_days: Option<u32>,

        /// detailed or names
        #[arg(long)]
        projection: Option<ProjectionMode>,

        /// git add/commit/push the output directory afterwards
        #[arg(long)]
        publish: bool,

        /// Repository the output directory is published from
        #[arg(long, default_value = ".")]
        repo_root: PathBuf,
    },

    /// Convert an exported game schedule to the processed table
    Schedule {
        #[arg(long, default_value = "data/schedule.csv")]
        input: PathBuf,

        #[arg(long, default_value = "data/schedule_processed.csv")]
        output: PathBuf,

        /// Class year tag to keep
        #[arg(long, default_value = "(2027)")]
        keep_year: String,

        /// Timezone every game time is converted to
        #[arg(long, default_value = "America/New_York")]
        target_tz: String,
    },

    /// Show the contact sheet color for a month
    Color {
        /// Month number (1-12); defaults to the current month
        #[arg(long)]
        month: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            out_dir,
            schedule,
            processed_schedule,
            config,
            strategy,
            limit,
            seed,
            recent_days,
            projection,
            publish,
            repo_root,
        } => {
            let mut config = match config {
                Some(path) => PipelineConfig::from_json_file(&path)?,
                None => PipelineConfig::default(),
            };
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if let Some(limit) = limit {
                config.top_n = limit;
            }
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            if let Some(days) = recent_days {
                config.recent_days = days;
            }
            if let Some(projection) = projection {
                config.projection = projection;
            }

            let paths = RunPaths {
                input,
                out_dir,
                schedule,
                processed_schedule,
            };
            handle_run(config, paths, publish.then_some(repo_root)).await?
        }
        Commands::Schedule {
            input,
            output,
            keep_year,
            target_tz,
        } => handle_schedule(input, output, keep_year, &target_tz)?,
        Commands::Color { month } => handle_color(month)?,
    }

    Ok(())
}

struct RunPaths {
    input: PathBuf,
    out_dir: PathBuf,
    schedule: Option<PathBuf>,
    processed_schedule: Option<PathBuf>,
}

/// Handle the 'run' command
async fn handle_run(config: PipelineConfig, paths: RunPaths, publish_from: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();
    let top_n = config.top_n;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let orchestrator = CallListOrchestrator::new(config)?;

    let outcome = orchestrator.load_and_run(&paths.input, paths.schedule.as_deref(), Utc::now(), &mut rng)?;

    let writer = ArtifactWriter::new(&paths.out_dir);
    let artifacts = writer.write_run(&outcome, &orchestrator.exporter(&outcome), top_n)?;

    if let (Some(path), Some(schedule)) = (&paths.processed_schedule, &outcome.schedule) {
        write_processed_schedule(path, &schedule.processed)?;
    }

    print_selection(&outcome);
    if let Some(schedule) = &outcome.schedule {
        print_games(&schedule.games);
    }

    println!();
    for path in artifacts.paths() {
        println!("{} {}", "✓".green(), path.display());
    }
    println!("Finished in {:?}", start.elapsed());

    if let Some(repo_root) = publish_from {
        let publisher = GitPublisher::new(repo_root);
        if !publish_best_effort(&publisher, &paths.out_dir, top_n).await {
            println!("{} publish failed, outputs were kept locally", "!".yellow());
        }
    }
    Ok(())
}

/// Handle the 'schedule' command
fn handle_schedule(input: PathBuf, output: PathBuf, keep_year: String, target_tz: &str) -> Result<()> {
    let preprocessor = SchedulePreprocessor::from_timezone_name(target_tz)
        .context("Invalid target timezone")?
        .with_keep_year(keep_year);

    let table = load_table(&input).with_context(|| format!("Failed to load schedule {}", input.display()))?;
    let games = preprocessor.process_table(&table);
    write_processed_schedule(&output, &games)?;

    let max_recruits = games.iter().map(|g| g.recruits.len()).max().unwrap_or(0);
    println!(
        "{} wrote {} games to {}",
        "✓".green(),
        games.len(),
        output.display()
    );
    println!(
        "  max {} recruits per game, only {} kept, times in {}",
        max_recruits,
        preprocessor.keep_year(),
        preprocessor.target_tz()
    );
    info!("schedule processing complete");
    Ok(())
}

/// Handle the 'color' command
fn handle_color(month: Option<u8>) -> Result<()> {
    let month = match month {
        Some(number) => Month::try_from(number).map_err(|_| anyhow!("Month must be 1-12, got {}", number))?,
        None => Month::try_from(Utc::now().month() as u8).map_err(|_| anyhow!("Invalid current month"))?,
    };
    let color = ContactColor::for_month(month);
    println!("{}: {}", month.name(), paint(color));
    Ok(())
}

fn paint(color: ContactColor) -> colored::ColoredString {
    match color {
        ContactColor::Navy => color.label().blue().bold(),
        ContactColor::ColumbiaBlue => color.label().cyan().bold(),
        ContactColor::Anthracite => color.label().bright_black().bold(),
    }
}

fn describe(record: &Record) -> String {
    let bucket = bucket_of(record, CALLED_PREFIX);
    let last_called = record.value("called_dt");
    match last_called.get(..10) {
        Some(day) => format!("{bucket}, last called {day}"),
        None => bucket.to_string(),
    }
}

/// Print the selection with a header
fn print_selection(outcome: &RunOutcome) {
    println!(
        "{}",
        format!(
            "Next calls ({} of {}, {} sheet, {}):",
            outcome.selected.len(),
            outcome.classified.len(),
            outcome.month_color,
            outcome.strategy
        )
        .bold()
        .blue()
    );
    for (rank, record) in outcome.selected.iter().enumerate() {
        println!(
            "{}. {} - {}",
            (rank + 1).to_string().green(),
            record.value(FULL_NAME),
            describe(record)
        );
    }
}

fn print_games(games: &[GameRecord]) {
    println!();
    println!("{}", "Games by tracked recruits:".bold().blue());
    for game in games.iter().filter(|g| g.total_tracked > 0).take(10) {
        let counts = game
            .color_counts
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(color, count)| format!("{} {}", paint(color), count))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} {} vs {} - {} tracked ({})",
            game.date,
            game.school_1,
            game.school_2,
            game.total_tracked.to_string().green(),
            counts
        );
    }
}
