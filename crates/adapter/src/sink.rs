//! Event sinks
//!
//! Observers that forward battle events out of the session: a synchronous
//! JSON-lines writer and a tokio channel for async consumers.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::{BattleEvent, BattleObserver};

/// Writes one JSON object per event, newline-terminated
pub struct JsonLinesObserver<W: Write + Send> {
    writer: W,
    written: usize,
    failed: bool,
}

impl<W: Write + Send> JsonLinesObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failed: false,
        }
    }

    /// Serialize and flush a single event
    pub fn write_event(&mut self, event: &BattleEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)
            .with_context(|| format!("failed to serialize {} event", event.name()))?;
        self.writer
            .write_all(b"\n")
            .context("failed to terminate event line")?;
        self.writer.flush().context("failed to flush event line")?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> BattleObserver for JsonLinesObserver<W> {
    fn on_event(&mut self, event: &BattleEvent) {
        if self.failed {
            return;
        }
        if let Err(err) = self.write_event(event) {
            // Stop writing after the first failure; the battle itself goes on.
            warn!(error = %err, "event sink failed, dropping further events");
            self.failed = true;
        }
    }
}

/// Forwards events into an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<BattleEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiver that drains it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BattleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl BattleObserver for ChannelObserver {
    fn on_event(&mut self, event: &BattleEvent) {
        if self.tx.send(event.clone()).is_err() {
            debug!(event = event.name(), "event receiver closed");
        }
    }
}
