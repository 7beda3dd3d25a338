//! Headless playback clock
//!
//! Stands in for the rendering collaborator: it listens to gem lifecycle events,
//! books the animation time each one would take, and reports the grid as idle
//! once that time has been played out.
//!
//! | Event            | Booked time                      |
//! |------------------|----------------------------------|
//! | swap reverted    | `2 * swapMs` (there and back)    |
//! | first batch      | `swapMs`                         |
//! | gems destroyed   | `destroyMs`                      |
//! | gems spawned     | `fallMs`                         |
//! | batch resolved   | `cascadePauseMs`                 |
//! | board reshuffled | `fallMs`                         |

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::core::config::TimingConfig;
use crate::engine::{BattleEvent, BattleObserver};

/// Shared animation budget. Clones share state, so one clone can be subscribed
/// to the session while the driver loop queries another.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    timing: TimingConfig,
    pending_ms: Arc<AtomicU64>,
}

impl PlaybackClock {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            pending_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Animation time still to play
    pub fn pending_ms(&self) -> u64 {
        self.pending_ms.load(Ordering::Acquire)
    }

    pub fn is_idle(&self) -> bool {
        self.pending_ms() == 0
    }

    fn book(&self, ms: u32) {
        self.pending_ms.fetch_add(u64::from(ms), Ordering::AcqRel);
    }

    /// Play out `elapsed_ms` of animation
    pub fn advance(&self, elapsed_ms: u32) {
        let elapsed = u64::from(elapsed_ms);
        let _ = self
            .pending_ms
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pending| {
                Some(pending.saturating_sub(elapsed))
            });
    }

    /// Drop any booked time
    pub fn skip(&self) {
        self.pending_ms.store(0, Ordering::Release);
    }

    /// Animation time an event books
    pub fn cost_of(&self, event: &BattleEvent) -> u32 {
        match event {
            BattleEvent::SwapReverted { .. } => self.timing.swap_ms.saturating_mul(2),
            BattleEvent::GemsDestroyed { .. } => self.timing.destroy_ms,
            BattleEvent::GemsSpawned { .. } | BattleEvent::BoardReshuffled { .. } => {
                self.timing.fall_ms
            }
            BattleEvent::BatchResolved { pass, .. } => {
                let swap = if *pass == 0 { self.timing.swap_ms } else { 0 };
                swap.saturating_add(self.timing.cascade_pause_ms)
            }
            _ => 0,
        }
    }
}

impl BattleObserver for PlaybackClock {
    fn on_event(&mut self, event: &BattleEvent) {
        let cost = self.cost_of(event);
        if cost > 0 {
            self.book(cost);
        }
    }
}
