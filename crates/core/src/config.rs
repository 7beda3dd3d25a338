//! Battle session configuration
//!
//! Everything a session needs is supplied once, up front, and never mutated by
//! the core: grid size, animation delays the controller waits on, turn timing,
//! effect tuning, AI weights, both combatants and who controls them.
//!
//! Configs are JSON documents with camelCase keys; every field is optional and
//! falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{ActorStats, EffectTable};
use crate::types::{
    GemType, Side, DEFAULT_AI_THINK_MS, DEFAULT_CASCADE_PAUSE_MS, DEFAULT_DESTROY_MS,
    DEFAULT_FALL_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_SWAP_MS, DEFAULT_TURN_LIMIT_MS,
    DEFAULT_WARNING_MS, GRID_HEIGHT, GRID_WIDTH, MAX_GRID_EDGE, MIN_GRID_EDGE,
};

/// Errors raised while loading or validating a [`BattleConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub width: u8,
    pub height: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
        }
    }
}

/// Animation delays, opaque to the core (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimingConfig {
    pub swap_ms: u32,
    pub destroy_ms: u32,
    pub fall_ms: u32,
    pub cascade_pause_ms: u32,
    /// Idle time required before a turn settles
    pub settle_delay_ms: u32,
    /// Delay before the heuristic AI submits its move
    pub ai_think_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            swap_ms: DEFAULT_SWAP_MS,
            destroy_ms: DEFAULT_DESTROY_MS,
            fall_ms: DEFAULT_FALL_MS,
            cascade_pause_ms: DEFAULT_CASCADE_PAUSE_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            ai_think_ms: DEFAULT_AI_THINK_MS,
        }
    }
}

/// Turn timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TurnConfig {
    /// Per-turn limit; zero or negative disables the timer
    pub time_limit_ms: i64,
    /// Remaining time at which the warning fires
    pub warning_ms: i64,
    pub first_side: Side,
}

impl TurnConfig {
    pub fn timer_enabled(&self) -> bool {
        self.time_limit_ms > 0
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: DEFAULT_TURN_LIMIT_MS,
            warning_ms: DEFAULT_WARNING_MS,
            first_side: Side::Player,
        }
    }
}

/// Heuristic and agent tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiConfig {
    pub red_weight: u32,
    pub blue_weight: u32,
    pub green_weight: u32,
    pub yellow_weight: u32,
    pub purple_weight: u32,
    pub grey_weight: u32,
    /// Invalid agent moves tolerated per turn before a forced skip
    pub max_invalid_retries: u32,
}

impl AiConfig {
    /// Priority weight of a kind
    pub fn weight(&self, kind: GemType) -> u32 {
        match kind {
            GemType::Red => self.red_weight,
            GemType::Blue => self.blue_weight,
            GemType::Green => self.green_weight,
            GemType::Yellow => self.yellow_weight,
            GemType::Purple => self.purple_weight,
            GemType::Grey => self.grey_weight,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            red_weight: 2,
            blue_weight: 2,
            green_weight: 1,
            yellow_weight: 5,
            purple_weight: 3,
            grey_weight: 4,
            max_invalid_retries: 10,
        }
    }
}

/// How a side's moves are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerKind {
    /// Swaps arrive from an input collaborator
    Human,
    /// The built-in move evaluator
    Ai,
    /// Discrete move indices from an external agent
    Agent,
}

/// Controller kind per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllersConfig {
    pub player: ControllerKind,
    pub enemy: ControllerKind,
}

impl ControllersConfig {
    pub fn for_side(&self, side: Side) -> ControllerKind {
        match side {
            Side::Player => self.player,
            Side::Enemy => self.enemy,
        }
    }
}

impl Default for ControllersConfig {
    fn default() -> Self {
        Self {
            player: ControllerKind::Human,
            enemy: ControllerKind::Ai,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleConfig {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub turn: TurnConfig,
    pub effects: EffectTable,
    pub ai: AiConfig,
    pub player: ActorStats,
    pub enemy: ActorStats,
    pub controllers: ControllersConfig,
    pub seed: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            timing: TimingConfig::default(),
            turn: TurnConfig::default(),
            effects: EffectTable::default(),
            ai: AiConfig::default(),
            player: ActorStats {
                name: String::from("Player"),
                ..ActorStats::default()
            },
            enemy: ActorStats {
                name: String::from("Enemy"),
                ..ActorStats::default()
            },
            controllers: ControllersConfig::default(),
            seed: 1,
        }
    }
}

impl BattleConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Apply `GEM_DUEL_*` environment overrides (seed and turn limit)
    pub fn with_env_overrides(mut self) -> Self {
        use std::env;

        if let Some(seed) = env::var("GEM_DUEL_SEED").ok().and_then(|s| s.parse().ok()) {
            self.seed = seed;
        }
        if let Some(limit) = env::var("GEM_DUEL_TURN_LIMIT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.turn.time_limit_ms = limit;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let edges = MIN_GRID_EDGE..=MAX_GRID_EDGE;
        if !edges.contains(&self.grid.width) || !edges.contains(&self.grid.height) {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} is outside {}..={}",
                self.grid.width, self.grid.height, MIN_GRID_EDGE, MAX_GRID_EDGE
            )));
        }
        if self.turn.timer_enabled() && self.turn.warning_ms >= self.turn.time_limit_ms {
            return Err(ConfigError::Invalid(format!(
                "warningMs ({}) must be below timeLimitMs ({})",
                self.turn.warning_ms, self.turn.time_limit_ms
            )));
        }
        for (side, stats) in [("player", &self.player), ("enemy", &self.enemy)] {
            if stats.max_hp == 0 {
                return Err(ConfigError::Invalid(format!("{} maxHp must be positive", side)));
            }
        }
        if self.ai.max_invalid_retries == 0 {
            return Err(ConfigError::Invalid(String::from(
                "ai.maxInvalidRetries must be positive",
            )));
        }
        Ok(())
    }
}
