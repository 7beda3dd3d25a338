//! Adapter module - outbound collaborators for a headless battle
//!
//! The engine only talks to the outside world through [`BattleObserver`]s and
//! the `grid_idle` flag it is ticked with. This crate provides both sides of
//! that boundary for running without a renderer:
//!
//! - [`sink`]: JSON-lines writer and tokio channel observers
//! - [`clock`]: a playback clock that books animation time per lifecycle event
//!   and answers "is the grid idle?"
//! - [`runtime`]: the synchronous driver loop and the async event pump
//!
//! # Event Stream
//!
//! Every event is one JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type":"turnStarted","side":"player","turn":1,"timeLimitMs":30000}
//! {"type":"batchResolved","side":"player","pass":0,"groups":[{"kind":"yellow","cells":[...]}]}
//! {"type":"effectsApplied","side":"player","bundle":{...},"applied":{"damage":27,...}}
//! {"type":"battleConcluded","winner":"player","turns":17,"history":[...]}
//! ```
//!
//! [`BattleObserver`]: gem_duel_engine::BattleObserver

pub mod clock;
pub mod runtime;
pub mod sink;

pub use gem_duel_core as core;
pub use gem_duel_engine as engine;
pub use gem_duel_types as types;

pub use clock::PlaybackClock;
pub use runtime::{pump_json_lines, run_headless, BattleSummary, EventStream, RunOptions};
pub use sink::{ChannelObserver, JsonLinesObserver};
