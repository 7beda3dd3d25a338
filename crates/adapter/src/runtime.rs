//! Headless runtime
//!
//! Bridges the synchronous battle loop with async event consumers: the session
//! is ticked on the calling thread while a tokio task drains the event channel.

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::clock::PlaybackClock;
use crate::engine::{BattleEvent, TurnController};
use crate::sink::ChannelObserver;
use crate::types::{Side, TICK_MS};

/// Driver loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Simulated milliseconds per tick
    pub tick_ms: u32,
    /// Give up after this many ticks
    pub max_ticks: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            max_ticks: 1_000_000,
        }
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSummary {
    pub winner: Option<Side>,
    pub turns: u32,
    pub ticks: u64,
    pub player_hp: u32,
    pub enemy_hp: u32,
}

/// Start the battle and tick it until it finishes or the tick budget runs out.
///
/// `clock` must already be subscribed to `controller`; it supplies the grid
/// idle signal and is advanced by the same amount as the session.
pub fn run_headless(
    controller: &mut TurnController,
    clock: &PlaybackClock,
    options: &RunOptions,
) -> Result<BattleSummary> {
    controller.start().context("failed to start battle")?;

    let tick_ms = options.tick_ms.max(1);
    let mut ticks = 0u64;
    while !controller.is_finished() && ticks < options.max_ticks {
        controller.tick(clock.is_idle(), tick_ms);
        clock.advance(tick_ms);
        ticks += 1;
    }

    let summary = BattleSummary {
        winner: controller.winner(),
        turns: controller.turn_number(),
        ticks,
        player_hp: controller.player().hp(),
        enemy_hp: controller.enemy().hp(),
    };
    match summary.winner {
        Some(winner) => info!(
            winner = winner.as_str(),
            turns = summary.turns,
            ticks,
            "headless battle finished"
        ),
        None => warn!(turns = summary.turns, ticks, "tick budget exhausted before a winner"),
    }
    Ok(summary)
}

/// Write every received event as a JSON line until the channel closes.
/// Returns the number of lines written.
pub async fn pump_json_lines<W>(mut rx: mpsc::UnboundedReceiver<BattleEvent>, mut writer: W) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0usize;
    while let Some(event) = rx.recv().await {
        let mut line = serde_json::to_vec(&event)
            .with_context(|| format!("failed to serialize {} event", event.name()))?;
        line.push(b'\n');
        writer
            .write_all(&line)
            .await
            .context("failed to write event line")?;
        written += 1;
    }
    writer.flush().await.context("failed to flush event stream")?;
    Ok(written)
}

/// Background JSON-lines event stream on its own tokio runtime
pub struct EventStream {
    runtime: Runtime,
    task: JoinHandle<Result<usize>>,
}

impl EventStream {
    /// Stream events to stdout. Subscribe the returned observer to the session.
    pub fn stdout() -> Result<(Self, ChannelObserver)> {
        Self::spawn(tokio::io::stdout())
    }

    /// Stream events to `writer`
    pub fn spawn<W>(writer: W) -> Result<(Self, ChannelObserver)>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let runtime = Runtime::new().context("failed to create tokio runtime")?;
        let (observer, rx) = ChannelObserver::channel();
        let task = runtime.spawn(pump_json_lines(rx, writer));
        Ok((Self { runtime, task }, observer))
    }

    /// Wait for the stream to drain. Every observer clone (usually owned by the
    /// session) must be dropped first or this never returns.
    pub fn finish(self) -> Result<usize> {
        let Self { runtime, task } = self;
        runtime
            .block_on(task)
            .context("event stream task panicked")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BattleConfig, ControllerKind};
    use crate::engine::EventLog;

    fn ai_vs_ai(seed: u32) -> BattleConfig {
        let mut config = BattleConfig::default();
        config.seed = seed;
        config.controllers.player = ControllerKind::Ai;
        config.controllers.enemy = ControllerKind::Ai;
        config
    }

    #[test]
    fn test_headless_battle_reaches_a_winner() {
        let config = ai_vs_ai(42);
        let clock = PlaybackClock::new(config.timing);
        let mut controller = TurnController::new(config);
        controller.subscribe(clock.clone());
        let log = EventLog::new();
        controller.subscribe(log.clone());

        let summary = run_headless(&mut controller, &clock, &RunOptions::default()).unwrap();
        assert!(summary.winner.is_some());
        assert_eq!(log.count("battleConcluded"), 1);
        assert!(summary.player_hp == 0 || summary.enemy_hp == 0);
    }

    #[test]
    fn test_tick_budget_stops_run() {
        let config = ai_vs_ai(7);
        let clock = PlaybackClock::new(config.timing);
        let mut controller = TurnController::new(config);
        controller.subscribe(clock.clone());

        let options = RunOptions {
            tick_ms: 16,
            max_ticks: 5,
        };
        let summary = run_headless(&mut controller, &clock, &options).unwrap();
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.winner, None);
    }

    #[test]
    fn test_missing_grid_fails_run() {
        let config = BattleConfig::default();
        let clock = PlaybackClock::new(config.timing);
        let mut controller = TurnController::with_grid(config, None);
        assert!(run_headless(&mut controller, &clock, &RunOptions::default()).is_err());
    }

    #[tokio::test]
    async fn test_pump_writes_lines_until_closed() {
        let (mut observer, rx) = ChannelObserver::channel();
        use crate::engine::BattleObserver;
        observer.on_event(&BattleEvent::TimeUp { side: Side::Player });
        observer.on_event(&BattleEvent::TimeUp { side: Side::Enemy });
        drop(observer);

        let mut out = Vec::new();
        let written = pump_json_lines(rx, &mut out).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }
}
