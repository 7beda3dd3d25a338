//! Discrete move space and bookkeeping for agent-controlled sides
//!
//! An external agent picks moves as plain indices. For a `W x H` grid:
//!
//! | Index range                        | Swap                      |
//! |------------------------------------|---------------------------|
//! | `0 .. W*(H-1)`                     | `(x, y) <-> (x, y+1)`     |
//! | `W*(H-1) .. W*(H-1) + (W-1)*H`     | `(x, y) <-> (x+1, y)`     |
//!
//! Vertical indices are `y*W + x`; horizontal ones are `y*(W-1) + x` past the
//! vertical block. On the default 8x8 grid that is 56 + 56 = 112 moves.
//!
//! Every invalid pick is banned for the rest of the turn; too many of them in a
//! row forfeits the turn.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Coord;

pub const INVALID_MOVE_PENALTY: f32 = -0.15;
pub const RETRY_CEILING_PENALTY: f32 = -1.0;
pub const REPEATED_MOVE_PENALTY: f32 = -0.2;
pub const CHANGED_MOVE_REWARD: f32 = 0.01;
pub const MATCH_REWARD: f32 = 0.2;
pub const WIN_REWARD: f32 = 5.0;
pub const LOSS_PENALTY: f32 = -2.0;

const DAMAGE_REWARD_SCALE: f32 = 80.0;
const DAMAGE_REWARD_CAP: f32 = 1.5;

/// Reward for a settled turn's raw damage power, capped
pub fn damage_reward(raw_damage: u32) -> f32 {
    (raw_damage as f32 / DAMAGE_REWARD_SCALE).clamp(0.0, DAMAGE_REWARD_CAP)
}

/// What a reward signal is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    RepeatedMove,
    ChangedMove,
    InvalidMove,
    RetryCeiling,
    Matched,
    Won,
    Lost,
}

/// A reward signal for a learning agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSignal {
    pub kind: SignalKind,
    pub reward: f32,
}

impl AgentSignal {
    pub fn new(kind: SignalKind, reward: f32) -> Self {
        Self { kind, reward }
    }

    /// Match reward plus the capped damage bonus
    pub fn matched(raw_damage: u32) -> Self {
        Self::new(SignalKind::Matched, MATCH_REWARD + damage_reward(raw_damage))
    }
}

/// Index <-> swap mapping for one grid size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSpace {
    width: u8,
    height: u8,
}

impl MoveSpace {
    pub fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    fn vertical_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height).saturating_sub(1)
    }

    fn horizontal_count(&self) -> usize {
        usize::from(self.width).saturating_sub(1) * usize::from(self.height)
    }

    /// Number of move indices
    pub fn len(&self) -> usize {
        self.vertical_count() + self.horizontal_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells swapped by `index`; None if out of range
    pub fn decode(&self, index: usize) -> Option<(Coord, Coord)> {
        let vertical = self.vertical_count();
        if index < vertical {
            let width = usize::from(self.width);
            let at = Coord::new((index % width) as i8, (index / width) as i8);
            return Some((at, at.offset(0, 1)));
        }

        let h = index - vertical;
        if h < self.horizontal_count() {
            let row = usize::from(self.width) - 1;
            let at = Coord::new((h % row) as i8, (h / row) as i8);
            return Some((at, at.offset(1, 0)));
        }
        None
    }

    /// Index of the swap between `a` and `b` (in either order)
    pub fn encode(&self, a: Coord, b: Coord) -> Option<usize> {
        if !a.is_adjacent(b) {
            return None;
        }
        let lo = a.min(b);
        let hi = a.max(b);
        if lo.x < 0 || lo.y < 0 || hi.x as u8 >= self.width || hi.y as u8 >= self.height {
            return None;
        }

        let (x, y) = (lo.x as usize, lo.y as usize);
        if lo.x == hi.x {
            Some(y * usize::from(self.width) + x)
        } else {
            Some(self.vertical_count() + y * (usize::from(self.width) - 1) + x)
        }
    }
}

/// Result of recording an invalid pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidVerdict {
    /// The agent may try again
    Retry { attempts: u32 },
    /// The ceiling was hit; the tracker has already been reset
    Forfeit,
}

/// Per-turn exclusion set and retry counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMoveTracker {
    banned: BTreeSet<usize>,
    attempts: u32,
    ceiling: u32,
    last_pick: Option<usize>,
}

impl InvalidMoveTracker {
    pub fn new(ceiling: u32) -> Self {
        Self {
            banned: BTreeSet::new(),
            attempts: 0,
            ceiling: ceiling.max(1),
            last_pick: None,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_banned(&self, index: usize) -> bool {
        self.banned.contains(&index)
    }

    pub fn banned_count(&self) -> usize {
        self.banned.len()
    }

    /// Remember a pick; returns true if it repeats the previous one
    pub fn note_pick(&mut self, index: usize) -> bool {
        let repeated = self.last_pick == Some(index);
        self.last_pick = Some(index);
        repeated
    }

    /// Ban `index` and count the attempt
    pub fn record_invalid(&mut self, index: usize) -> InvalidVerdict {
        self.banned.insert(index);
        self.attempts += 1;
        if self.attempts >= self.ceiling {
            self.clear();
            return InvalidVerdict::Forfeit;
        }
        InvalidVerdict::Retry {
            attempts: self.attempts,
        }
    }

    /// Forget bans and attempts (successful match)
    pub fn clear(&mut self) {
        self.banned.clear();
        self.attempts = 0;
    }

    /// Start of a new turn
    pub fn reset_turn(&mut self) {
        self.clear();
        self.last_pick = None;
    }

    /// Which indices of `space` are currently allowed
    pub fn action_mask(&self, space: &MoveSpace) -> Vec<bool> {
        (0..space.len()).map(|i| !self.is_banned(i)).collect()
    }
}
