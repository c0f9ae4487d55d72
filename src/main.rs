use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leaguestats::{
    config::{parse_weeks, AppConfig},
    export, fetch,
    fetch::SleeperClient,
    pipeline, render,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "leaguestats")]
#[command(about = "All-time fantasy league leaderboard and Sleeper history pulls")]
#[command(version)]
struct Cli {
    /// YAML config with column aliases, scoring weights and Sleeper settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a season table and print the leaderboard and awards
    Leaderboard {
        /// Season table CSV, one row per owner per season
        csv: PathBuf,
        /// Only count wins, losses, points and moves from this year on
        #[arg(long)]
        stats_from: Option<i32>,
        /// Print only these owners (repeatable); awards still use everyone
        #[arg(long = "owner")]
        owners: Vec<String>,
        /// Also write the leaderboard as Parquet
        #[arg(long)]
        parquet: Option<PathBuf>,
        /// Also write the leaderboard as CSV
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },
    /// Pull league history from the Sleeper API
    Pull {
        #[command(subcommand)]
        what: PullCommands,
    },
}

#[derive(Subcommand)]
enum PullCommands {
    /// Season standings with playoff results and transaction counts
    Standings {
        #[arg(long)]
        league_id: Option<String>,
        /// Seasons to pull (comma-separated), e.g. 2025,2024
        #[arg(long, value_delimiter = ',')]
        seasons: Vec<String>,
        #[arg(long, default_value = "standings.csv")]
        out: PathBuf,
    },
    /// Highest scorer of each week and who they played
    WeeklyHigh {
        #[arg(long)]
        league_id: Option<String>,
        /// Week list such as 1-15 or 1-4,9
        #[arg(long)]
        weeks: Option<String>,
        #[arg(long, default_value = "weekly_high.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut cfg = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Leaderboard {
            csv,
            stats_from,
            owners,
            parquet,
            csv_out,
        } => {
            if stats_from.is_some() {
                cfg.scoring.stats_from_year = stats_from;
            }
            leaderboard(&csv, &cfg, &owners, parquet.as_deref(), csv_out.as_deref())
        }
        Commands::Pull { what } => {
            match what {
                PullCommands::Standings {
                    league_id,
                    seasons,
                    out,
                } => {
                    if let Some(id) = league_id {
                        cfg.sleeper.league_id = id;
                    }
                    if !seasons.is_empty() {
                        cfg.sleeper.seasons = seasons;
                    }
                    cfg.validate()?;
                    let client = SleeperClient::new(&cfg.sleeper)?;
                    let rows = fetch::pull_standings(&client, &cfg.sleeper).await?;
                    fetch::write_csv(&out, &rows)?;
                    println!("Wrote {} rows to {}", rows.len(), out.display());
                }
                PullCommands::WeeklyHigh {
                    league_id,
                    weeks,
                    out,
                } => {
                    if let Some(id) = league_id {
                        cfg.sleeper.league_id = id;
                    }
                    if let Some(list) = weeks {
                        cfg.sleeper.weeks = parse_weeks(&list)?;
                    }
                    cfg.validate()?;
                    let client = SleeperClient::new(&cfg.sleeper)?;
                    let rows = fetch::pull_weekly_high(&client, &cfg.sleeper).await?;
                    fetch::write_csv(&out, &rows)?;
                    println!("Wrote {} rows to {}", rows.len(), out.display());
                }
            }
            Ok(())
        }
    }
}

fn leaderboard(
    csv: &Path,
    cfg: &AppConfig,
    owners: &[String],
    parquet: Option<&Path>,
    csv_out: Option<&Path>,
) -> Result<()> {
    let report = pipeline::run_leaderboard(csv, cfg)
        .with_context(|| format!("building leaderboard from {:?}", csv))?;

    let shown = render::filter_owners(&report.entries, owners);
    println!("All-time leaderboard");
    render::leaderboard_table(&report.entries, &shown).printstd();
    println!();
    println!("Superlatives");
    render::superlatives_table(&report.superlatives).printstd();

    if let Some(path) = parquet {
        export::write_leaderboard_parquet(path, &report.entries)?;
    }
    if let Some(path) = csv_out {
        export::write_leaderboard_csv(path, &report.entries)?;
    }
    info!(owners = report.entries.len(), "done");
    Ok(())
}
