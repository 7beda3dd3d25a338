//! Headless battle runner (default binary).
//!
//! Plays one AI-vs-AI battle and streams every battle event to stdout as JSON
//! lines. Logs go to stderr; set `RUST_LOG` to change the level.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gem_duel::adapter::{run_headless, EventStream, JsonLinesObserver, PlaybackClock, RunOptions};
use gem_duel::core::{BattleConfig, ControllerKind};
use gem_duel::engine::TurnController;
use gem_duel::types::TICK_MS;

#[derive(Debug, Parser)]
#[command(name = "gem-duel", version, about = "Run a headless gem duel between two AIs")]
struct Cli {
    /// JSON battle config (defaults apply to missing keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the config seed
    #[arg(short, long)]
    seed: Option<u32>,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = TICK_MS)]
    tick_ms: u32,

    /// Stop after this many ticks even without a winner
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,

    /// Do not stream events to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Also record every event as JSON lines in this file
    #[arg(long, value_name = "PATH")]
    events_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => BattleConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BattleConfig::default(),
    }
    .with_env_overrides();
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.controllers.player = ControllerKind::Ai;
    config.controllers.enemy = ControllerKind::Ai;
    config.validate().context("invalid battle config")?;

    let options = RunOptions {
        tick_ms: cli.tick_ms,
        max_ticks: cli.max_ticks,
    };
    let clock = PlaybackClock::new(config.timing);
    let mut controller = TurnController::new(config);
    controller.subscribe(clock.clone());

    if let Some(path) = &cli.events_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create events file {}", path.display()))?;
        controller.subscribe(JsonLinesObserver::new(BufWriter::new(file)));
    }

    let stream = if cli.quiet {
        None
    } else {
        let (stream, observer) = EventStream::stdout()?;
        controller.subscribe(observer);
        Some(stream)
    };

    let summary = run_headless(&mut controller, &clock, &options)?;
    // Dropping the session closes the event channel so the stream can drain.
    drop(controller);
    if let Some(stream) = stream {
        let lines = stream.finish()?;
        info!(lines, "event stream drained");
    }

    info!(
        winner = summary.winner.map(|side| side.as_str()).unwrap_or("none"),
        turns = summary.turns,
        ticks = summary.ticks,
        player_hp = summary.player_hp,
        enemy_hp = summary.enemy_hp,
        "battle summary"
    );
    Ok(())
}
