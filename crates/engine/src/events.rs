//! Battle events and observer registration
//!
//! The turn controller reports everything it does as a [`BattleEvent`] to the
//! observers registered on it. Renderers replay gem lifecycle events, loggers
//! and reward layers consume the rest.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::agent::AgentSignal;
use crate::core::{Actor, AppliedEffects, EffectBundle, Gem, GemFall, GridSnapshot, MatchGroup, SwapRejection};
use crate::types::{Coord, Side};

/// Why a turn ended without a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The AI found no swap that forms a match
    NoMoveAvailable,
    /// An agent used up its invalid-move retries
    RetryCeiling,
}

/// One settled turn, as kept in the battle history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub turn: u32,
    pub side: Side,
    pub swap: Option<(Coord, Coord)>,
    /// Cascade passes resolved this turn
    pub passes: usize,
    pub bundle: EffectBundle,
    pub applied: AppliedEffects,
    pub timed_out: bool,
    pub skipped: Option<SkipReason>,
}

/// Everything the battle reports to its observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BattleEvent {
    BattleStarted {
        player: Actor,
        enemy: Actor,
        grid: GridSnapshot,
        first: Side,
    },
    TurnStarted {
        side: Side,
        turn: u32,
        time_limit_ms: i64,
    },
    InputGate {
        side: Side,
        open: bool,
    },
    SwapRejected {
        side: Side,
        rejection: SwapRejection,
    },
    SwapReverted {
        side: Side,
        a: Coord,
        b: Coord,
    },
    GemsDestroyed {
        pass: usize,
        gems: Vec<Gem>,
    },
    GemsFell {
        pass: usize,
        falls: Vec<GemFall>,
    },
    GemsSpawned {
        pass: usize,
        gems: Vec<Gem>,
    },
    BatchResolved {
        side: Side,
        pass: usize,
        groups: Vec<MatchGroup>,
    },
    TimerWarning {
        side: Side,
        remaining_ms: i64,
    },
    TimeUp {
        side: Side,
    },
    NoMoveAvailable {
        side: Side,
    },
    TurnSkipped {
        side: Side,
        reason: SkipReason,
    },
    /// The board had no scoring swap and was regenerated
    BoardReshuffled {
        grid: GridSnapshot,
    },
    EffectsApplied {
        side: Side,
        bundle: EffectBundle,
        applied: AppliedEffects,
    },
    StatsChanged {
        side: Side,
        actor: Actor,
    },
    CombatLog {
        message: String,
    },
    AgentSignal {
        side: Side,
        signal: AgentSignal,
    },
    BattleConcluded {
        winner: Side,
        turns: u32,
        history: Vec<TurnRecord>,
    },
}

impl BattleEvent {
    /// Event name as it appears in the `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            BattleEvent::BattleStarted { .. } => "battleStarted",
            BattleEvent::TurnStarted { .. } => "turnStarted",
            BattleEvent::InputGate { .. } => "inputGate",
            BattleEvent::SwapRejected { .. } => "swapRejected",
            BattleEvent::SwapReverted { .. } => "swapReverted",
            BattleEvent::GemsDestroyed { .. } => "gemsDestroyed",
            BattleEvent::GemsFell { .. } => "gemsFell",
            BattleEvent::GemsSpawned { .. } => "gemsSpawned",
            BattleEvent::BatchResolved { .. } => "batchResolved",
            BattleEvent::TimerWarning { .. } => "timerWarning",
            BattleEvent::TimeUp { .. } => "timeUp",
            BattleEvent::NoMoveAvailable { .. } => "noMoveAvailable",
            BattleEvent::TurnSkipped { .. } => "turnSkipped",
            BattleEvent::BoardReshuffled { .. } => "boardReshuffled",
            BattleEvent::EffectsApplied { .. } => "effectsApplied",
            BattleEvent::StatsChanged { .. } => "statsChanged",
            BattleEvent::CombatLog { .. } => "combatLog",
            BattleEvent::AgentSignal { .. } => "agentSignal",
            BattleEvent::BattleConcluded { .. } => "battleConcluded",
        }
    }
}

/// Receives battle events in emission order
pub trait BattleObserver: Send {
    fn on_event(&mut self, event: &BattleEvent);
}

impl<F> BattleObserver for F
where
    F: FnMut(&BattleEvent) + Send,
{
    fn on_event(&mut self, event: &BattleEvent) {
        self(event)
    }
}

/// In-memory event recorder. Clones share the same buffer, so one clone can be
/// subscribed while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<BattleEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_events<R>(&self, f: impl FnOnce(&mut Vec<BattleEvent>) -> R) -> R {
        let mut guard = self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Copy of every recorded event
    pub fn events(&self) -> Vec<BattleEvent> {
        self.with_events(|events| events.clone())
    }

    /// Remove and return every recorded event
    pub fn take(&self) -> Vec<BattleEvent> {
        self.with_events(std::mem::take)
    }

    pub fn len(&self) -> usize {
        self.with_events(|events| events.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded events with the given `type` name
    pub fn count(&self, name: &str) -> usize {
        self.with_events(|events| events.iter().filter(|e| e.name() == name).count())
    }
}

impl BattleObserver for EventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.with_events(|events| events.push(event.clone()));
    }
}
