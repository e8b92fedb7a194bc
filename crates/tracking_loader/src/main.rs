//! Gridiron CLI
//!
//! Inspect, split and replay tracking tables; render manual snapshots.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use gridiron_core::{ColumnMapping, EngineConfig, FrameRenderer, PlayerEntry, SnapshotInput, TeamSlot};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Replay and inspect player tracking data", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One caption line per frame
    Summary,
    /// One JSON render frame per line
    Json,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// List columns with value counts and inferred kinds
    Columns {
        /// Input table (.csv, .json or .parquet)
        file: PathBuf,
    },

    /// Split a table into one file per game, in the input format
    Split {
        /// Input table (.csv, .json or .parquet)
        file: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Game id column
        #[arg(long, default_value = "gameId")]
        column: String,
    },

    /// Play a table from the first frame to the end
    Replay {
        /// Input table (.csv, .json or .parquet)
        file: PathBuf,

        /// Engine config (.json, .yaml or .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use NFL tracking column names (displayName, club, s, dir, frameId, ...)
        #[arg(long, default_value = "false")]
        nfl: bool,

        /// Keep only this game id
        #[arg(long)]
        game: Option<i64>,

        #[arg(long, value_enum, default_value = "summary")]
        format: OutputFormat,

        /// Wait out each tick interval instead of running on virtual time
        #[arg(long, default_value = "false")]
        realtime: bool,
    },

    /// Render a hand-built snapshot
    Snapshot {
        /// Snapshot input (.json); omit to build from flags only
        file: Option<PathBuf>,

        /// Engine config (.json, .yaml or .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Team A player as "name,x,y,speed,direction" (repeatable)
        #[arg(long = "team-a")]
        team_a: Vec<String>,

        /// Team B player as "name,x,y,speed,direction" (repeatable)
        #[arg(long = "team-b")]
        team_b: Vec<String>,

        /// Caption text
        #[arg(long)]
        extra: Option<String>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Columns { file } => {
            let table = tracking_loader::load_table(&file)?;
            println!("Columns in {} ({} rows):", file.display(), table.len());
            for column in tracking_loader::describe_columns(&table) {
                println!(
                    "   {:<24} {:<8} present={:<8} missing={}",
                    column.name, column.kind, column.present, column.missing
                );
            }
        }

        Commands::Split { file, out, column } => {
            println!("🔨 Splitting by '{}'...", column);
            println!("   Input:  {}", file.display());
            println!("   Output: {}", out.display());

            let format = tracking_loader::TableFormat::from_path(&file)?;
            let table = tracking_loader::load_table(&file)?;
            let manifest = tracking_loader::split_by_game(&table, &column, &out, format)?;

            println!("\n✅ Split {} games ({} rows)", manifest.games.len(), manifest.total_rows());
            for game in &manifest.games {
                println!("   {:<28} {:>8} rows  {}", game.file, game.rows, game.checksum);
            }
            if manifest.skipped_rows > 0 {
                println!("   Skipped {} rows without a game id", manifest.skipped_rows);
            }
            println!("   Created: {}", manifest.created_at);
        }

        Commands::Replay { file, config, nfl, game, format, realtime } => {
            let mut config = resolve_config(config.as_deref(), EngineConfig::continuous())?;
            if nfl {
                config.columns = ColumnMapping::nfl_tracking();
            }
            let clock = if realtime { tracking_loader::Clock::Realtime } else { tracking_loader::Clock::Virtual };
            let table = tracking_loader::load_table(&file)?;
            let stdout = std::io::stdout().lock();

            match format {
                OutputFormat::Summary => {
                    let renderer = tracking_loader::CaptionRenderer::new(stdout);
                    let renderer = run_replay(&table, &config, game, clock, renderer)?;
                    renderer.finish()?;
                }
                OutputFormat::Json => {
                    let renderer = tracking_loader::JsonLinesRenderer::new(stdout);
                    let renderer = run_replay(&table, &config, game, clock, renderer)?;
                    renderer.finish()?;
                }
            }
        }

        Commands::Snapshot { file, config, team_a, team_b, extra } => {
            let config = resolve_config(config.as_deref(), EngineConfig::snapshot())?;
            let mut input = match file {
                Some(path) => read_snapshot_input(&path)?,
                None => SnapshotInput::default(),
            };
            for (slot, entries) in [(TeamSlot::A, team_a), (TeamSlot::B, team_b)] {
                for text in entries {
                    let player =
                        text.parse::<PlayerEntry>().with_context(|| format!("Invalid player '{}'", text))?;
                    match slot {
                        TeamSlot::A => input.team_a.push(player),
                        TeamSlot::B => input.team_b.push(player),
                    }
                }
            }
            if let Some(extra) = extra {
                input.extra = extra;
            }

            let (builder, ball_error) = input.into_builder(config.field);
            if let Some(err) = ball_error {
                eprintln!("⚠️  Ball data invalid or missing: {}", err);
            }
            let frame = builder.render(&config.mapper(), &config.palette);
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn resolve_config(path: Option<&Path>, fallback: EngineConfig) -> Result<EngineConfig> {
    match path {
        Some(path) => tracking_loader::load_config(path),
        None => Ok(fallback),
    }
}

#[cfg(feature = "cli")]
fn read_snapshot_input(path: &Path) -> Result<SnapshotInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse snapshot file: {}", path.display()))
}

#[cfg(feature = "cli")]
fn run_replay<R: FrameRenderer>(
    table: &gridiron_core::RawTable,
    config: &EngineConfig,
    game: Option<i64>,
    clock: tracking_loader::Clock,
    renderer: R,
) -> Result<R> {
    let (mut controller, report) = tracking_loader::open_session(table, config, game, renderer)?;
    eprintln!(
        "▶️  {} frames from {} rows ({} dropped)",
        controller.frames().len(),
        report.total_rows,
        report.dropped_rows()
    );

    let outcome = tracking_loader::play_to_end(&mut controller, clock);
    eprintln!(
        "✅ Replay finished: {} ticks, {:.1}s of playback",
        outcome.ticks,
        outcome.playback_ms as f64 / 1000.0
    );
    Ok(controller.into_renderer())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gridiron CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
