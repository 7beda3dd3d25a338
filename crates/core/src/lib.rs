//! Core battle logic - pure, deterministic, and testable
//!
//! This crate contains the board rules and combat math of a gem-matching duel.
//! It has **no dependencies** on rendering, input or I/O beyond loading a config,
//! making it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Every rule is exercised by unit tests next to the code
//! - **Portable**: Runs headless, under a renderer, or inside an agent trainer
//!
//! # Module Structure
//!
//! - [`grid`]: gem arena with placement, swaps, gravity compaction and refill
//! - [`matcher`]: run detection and merging into disjoint match groups
//! - [`cascade`]: swap validation and the remove/compact/refill/detect loop
//! - [`combat`]: actors, effect bundles and their application
//! - [`config`]: session configuration loaded from JSON
//! - [`rng`]: deterministic gem generation
//! - [`snapshot`]: type-only grid copies and textual layouts
//!
//! # Board Rules
//!
//! - **Matches**: straight runs of 3+ gems of one kind; touching runs merge (T, L, +)
//! - **Size multiplier**: 3 -> x1, 4 -> x2, 5 -> x3
//! - **Swaps**: adjacent cells only; a swap that forms no match is reverted
//! - **Refill**: new gems never complete a run with the two cells below or to the left
//!
//! # Example
//!
//! ```
//! use gem_duel_core::{resolve_swap, Grid, SimpleRng, SwapOutcome};
//! use gem_duel_types::Coord;
//!
//! let mut grid = Grid::from_layout(&["GBYP", "BGRY", "RRGB"]).unwrap();
//! let mut rng = SimpleRng::new(7);
//!
//! let outcome = resolve_swap(&mut grid, &mut rng, Coord::new(2, 0), Coord::new(2, 1)).unwrap();
//! match outcome {
//!     SwapOutcome::Resolved(report) => assert!(report.destroyed_count() >= 3),
//!     SwapOutcome::Reverted => unreachable!(),
//! }
//! ```

pub mod cascade;
pub mod combat;
pub mod config;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod snapshot;

pub use gem_duel_types as types;

// Re-export commonly used types for convenience
pub use cascade::{
    resolve_swap, CascadePass, CascadePhase, CascadeReport, CascadeResolver, SwapOutcome,
    SwapRejection, SwapVerdict, MAX_CASCADE_PASSES,
};
pub use combat::{
    apply_effects, compute_effects, final_damage, Actor, ActorStats, AppliedEffects,
    EffectBundle, EffectTable, EffectTuning,
};
pub use config::{BattleConfig, ConfigError, ControllerKind};
pub use grid::{Gem, GemFall, GemId, GravityReport, Grid};
pub use matcher::{find_matches, has_match, size_multiplier, KindView, MatchGroup};
pub use rng::SimpleRng;
pub use snapshot::{GridSnapshot, LayoutError};
