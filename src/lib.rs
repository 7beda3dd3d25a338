//! Gem Duel (workspace facade crate).
//!
//! Re-exports the member crates as `gem_duel::{types,core,engine,adapter}` so
//! binaries, integration tests and benches depend on a single package while the
//! implementation lives in dedicated crates under `crates/`.

pub use gem_duel_adapter as adapter;
pub use gem_duel_core as core;
pub use gem_duel_engine as engine;
pub use gem_duel_types as types;
