//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the battle core.
//! All types are plain data, usable in any context (grid logic, combat math,
//! AI scoring, event serialization).
//!
//! # Grid Dimensions
//!
//! - **Width**: 8 columns by default (indexed 0-7, left to right)
//! - **Height**: 8 rows by default (indexed 0-7, bottom to top)
//! - Gravity pulls gems toward row 0.
//!
//! # Timing Defaults
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep used by the headless driver (~60 FPS) |
//! | `DEFAULT_SWAP_MS` | 300 | Swap animation length |
//! | `DEFAULT_DESTROY_MS` | 500 | Destroy animation length per cascade pass |
//! | `DEFAULT_FALL_MS` | 500 | Fall/refill animation length per cascade pass |
//! | `DEFAULT_CASCADE_PAUSE_MS` | 250 | Pause between chained cascade passes |
//! | `DEFAULT_SETTLE_DELAY_MS` | 50 | Idle time required before a turn settles |
//! | `DEFAULT_AI_THINK_MS` | 250 | Delay before the AI commits its move |
//! | `DEFAULT_TURN_LIMIT_MS` | 30000 | Turn timer (values <= 0 disable it) |
//! | `DEFAULT_WARNING_MS` | 10000 | Remaining time that triggers the warning |
//!
//! # Examples
//!
//! ```
//! use gem_duel_types::{Coord, GemType, Side};
//!
//! let kind = GemType::from_symbol('Y').unwrap();
//! assert_eq!(kind, GemType::Yellow);
//! assert_eq!(kind.effect_class(), gem_duel_types::EffectClass::Damage);
//!
//! assert!(Coord::new(2, 3).is_adjacent(Coord::new(2, 4)));
//! assert!(!Coord::new(2, 3).is_adjacent(Coord::new(3, 4)));
//!
//! assert_eq!(Side::Player.opponent(), Side::Enemy);
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width in cells
pub const GRID_WIDTH: u8 = 8;
/// Default grid height in cells
pub const GRID_HEIGHT: u8 = 8;
/// Largest supported grid edge (coordinates are stored as `i8`)
pub const MAX_GRID_EDGE: u8 = 64;
/// Smallest grid edge that can hold a run
pub const MIN_GRID_EDGE: u8 = 3;

/// Shortest run that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Number of gem kinds
pub const GEM_KIND_COUNT: usize = 6;

/// Timing defaults (in milliseconds)
pub const TICK_MS: u32 = 16;
pub const DEFAULT_SWAP_MS: u32 = 300;
pub const DEFAULT_DESTROY_MS: u32 = 500;
pub const DEFAULT_FALL_MS: u32 = 500;
pub const DEFAULT_CASCADE_PAUSE_MS: u32 = 250;
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 50;
pub const DEFAULT_AI_THINK_MS: u32 = 250;
pub const DEFAULT_TURN_LIMIT_MS: i64 = 30_000;
pub const DEFAULT_WARNING_MS: i64 = 10_000;

/// Gem kinds. Each kind is bound to exactly one combat effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GemType {
    /// Rage gain
    Red,
    /// Mana gain
    Blue,
    /// Self heal
    Green,
    /// Burst damage
    Yellow,
    /// Drains the opponent's rage
    Purple,
    /// Lifesteal (damage plus partial self heal)
    Grey,
}

impl GemType {
    /// All kinds in index order
    pub const ALL: [GemType; GEM_KIND_COUNT] = [
        GemType::Red,
        GemType::Blue,
        GemType::Green,
        GemType::Yellow,
        GemType::Purple,
        GemType::Grey,
    ];

    /// Stable index (0..6), used for per-kind lookup tables
    pub fn index(self) -> usize {
        match self {
            GemType::Red => 0,
            GemType::Blue => 1,
            GemType::Green => 2,
            GemType::Yellow => 3,
            GemType::Purple => 4,
            GemType::Grey => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(GemType::Red),
            "blue" => Some(GemType::Blue),
            "green" => Some(GemType::Green),
            "yellow" => Some(GemType::Yellow),
            "purple" => Some(GemType::Purple),
            "grey" | "gray" => Some(GemType::Grey),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GemType::Red => "red",
            GemType::Blue => "blue",
            GemType::Green => "green",
            GemType::Yellow => "yellow",
            GemType::Purple => "purple",
            GemType::Grey => "grey",
        }
    }

    /// One-character symbol used by textual grid layouts
    pub fn symbol(&self) -> char {
        match self {
            GemType::Red => 'R',
            GemType::Blue => 'B',
            GemType::Green => 'G',
            GemType::Yellow => 'Y',
            GemType::Purple => 'P',
            GemType::Grey => 'X',
        }
    }

    /// Parse a layout symbol (case-insensitive)
    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(GemType::Red),
            'B' => Some(GemType::Blue),
            'G' => Some(GemType::Green),
            'Y' => Some(GemType::Yellow),
            'P' => Some(GemType::Purple),
            'X' => Some(GemType::Grey),
            _ => None,
        }
    }

    /// The combat effect this kind produces when matched
    pub fn effect_class(&self) -> EffectClass {
        match self {
            GemType::Red => EffectClass::RageGain,
            GemType::Blue => EffectClass::ManaGain,
            GemType::Green => EffectClass::Heal,
            GemType::Yellow => EffectClass::Damage,
            GemType::Purple => EffectClass::RageDrain,
            GemType::Grey => EffectClass::Lifesteal,
        }
    }
}

/// Combat effect families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectClass {
    Damage,
    Lifesteal,
    Heal,
    ManaGain,
    RageGain,
    RageDrain,
}

impl EffectClass {
    /// Whether the effect contributes raw damage power
    pub fn deals_damage(&self) -> bool {
        matches!(self, EffectClass::Damage | EffectClass::Lifesteal)
    }
}

/// Grid coordinate. `y = 0` is the bottom row.
///
/// Signed so that out-of-bounds requests coming from input or agents
/// stay representable and can be rejected explicitly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Offset by (dx, dy), saturating at the `i8` range
    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// 4-neighbour adjacency (Manhattan distance exactly 1)
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dx = (i16::from(self.x) - i16::from(other.x)).abs();
        let dy = (i16::from(self.y) - i16::from(other.y)).abs();
        dx + dy == 1
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Battle participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Enemy => "enemy",
        }
    }
}

/// Cell of a type-only grid (None = empty)
pub type Cell = Option<GemType>;
