//! Battle engine - turn flow, AI and events on top of the core rules
//!
//! # Module Structure
//!
//! - [`turn`]: the battle session state machine driven by `tick`
//! - [`evaluator`]: heuristic move selection on type-only grid copies
//! - [`agent`]: discrete move indices and invalid-move bookkeeping for agents
//! - [`events`]: battle events, observers and the in-memory event log
//!
//! # Example
//!
//! ```
//! use gem_duel_core::BattleConfig;
//! use gem_duel_engine::{EventLog, TurnController, TurnPhase};
//!
//! let mut config = BattleConfig::default();
//! config.controllers.player = gem_duel_core::ControllerKind::Ai;
//!
//! let mut battle = TurnController::new(config);
//! let log = EventLog::new();
//! battle.subscribe(log.clone());
//! battle.start().unwrap();
//!
//! // Drive the session until both AIs have played a few turns.
//! for _ in 0..200 {
//!     battle.tick(true, 16);
//! }
//! assert!(battle.turn_number() > 1 || battle.phase() == TurnPhase::Finished);
//! assert!(log.count("battleStarted") == 1);
//! ```

pub mod agent;
pub mod evaluator;
pub mod events;
pub mod turn;

pub use gem_duel_core as core;
pub use gem_duel_types as types;

pub use agent::{AgentSignal, InvalidMoveTracker, MoveSpace, SignalKind};
pub use evaluator::{MoveEvaluator, ScoredMove};
pub use events::{BattleEvent, BattleObserver, EventLog, SkipReason, TurnRecord};
pub use turn::{AgentMoveOutcome, SessionError, SubmitOutcome, TurnController, TurnPhase, TurnTimer};
