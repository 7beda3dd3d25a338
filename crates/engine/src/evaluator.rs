//! Heuristic move evaluator for the built-in AI
//!
//! Every adjacent pair (right neighbour, then up neighbour, per cell in x-major
//! order) is tried on a type-only copy of the grid: swap, detect, swap back.
//! The real grid is never touched.
//!
//! Score of a hypothetical match set: for each kind present,
//! `ceil(cells / 3) * base * weight`, summed over kinds.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::AiConfig;
use crate::core::{find_matches, EffectTable, Grid, GridSnapshot, KindView, MatchGroup};
use crate::types::{Coord, GemType, GEM_KIND_COUNT, MIN_MATCH_LEN};

/// A candidate swap and its heuristic score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredMove {
    pub a: Coord,
    pub b: Coord,
    pub score: u32,
}

/// Scores swaps with per-kind `base * weight` values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEvaluator {
    /// `base * weight`, indexed by `GemType::index`
    kind_value: [u32; GEM_KIND_COUNT],
}

impl MoveEvaluator {
    pub fn new(ai: &AiConfig, effects: &EffectTable) -> Self {
        let mut kind_value = [0; GEM_KIND_COUNT];
        for kind in GemType::ALL {
            kind_value[kind.index()] = effects.base(kind).saturating_mul(ai.weight(kind));
        }
        Self { kind_value }
    }

    pub fn kind_value(&self, kind: GemType) -> u32 {
        self.kind_value[kind.index()]
    }

    /// Heuristic value of a set of match groups.
    ///
    /// Cells are counted from merged, disjoint groups, so a cell shared by
    /// crossing runs counts once.
    pub fn score_groups(&self, groups: &[MatchGroup]) -> u32 {
        let mut cells = [0usize; GEM_KIND_COUNT];
        for group in groups {
            cells[group.kind.index()] += group.len();
        }

        GemType::ALL
            .iter()
            .filter(|kind| cells[kind.index()] > 0)
            .map(|kind| {
                let sets = cells[kind.index()].div_ceil(MIN_MATCH_LEN) as u32;
                sets.saturating_mul(self.kind_value(*kind))
            })
            .fold(0u32, u32::saturating_add)
    }

    /// Score one swap on `scratch`, leaving it as it was.
    ///
    /// None when the swap is not worth considering: a cell is empty or out of
    /// bounds, both cells hold the same kind, or no match forms.
    pub fn score_swap(&self, scratch: &mut GridSnapshot, a: Coord, b: Coord) -> Option<u32> {
        let (ka, kb) = (scratch.kind_at(a)?, scratch.kind_at(b)?);
        if ka == kb {
            return None;
        }

        scratch.swap(a, b);
        let groups = find_matches(scratch);
        scratch.swap(a, b);

        if groups.is_empty() {
            return None;
        }
        Some(self.score_groups(&groups))
    }

    /// Every positively scored swap in enumeration order
    pub fn candidates(&self, snapshot: &GridSnapshot) -> Vec<ScoredMove> {
        let mut scratch = snapshot.clone();
        let mut out = Vec::new();

        for x in 0..snapshot.width() as i8 {
            for y in 0..snapshot.height() as i8 {
                let at = Coord::new(x, y);
                let neighbours: ArrayVec<Coord, 2> = [at.offset(1, 0), at.offset(0, 1)]
                    .into_iter()
                    .filter(|n| n.x < snapshot.width() as i8 && n.y < snapshot.height() as i8)
                    .collect();

                for n in neighbours {
                    if let Some(score) = self.score_swap(&mut scratch, at, n) {
                        if score > 0 {
                            out.push(ScoredMove { a: at, b: n, score });
                        }
                    }
                }
            }
        }
        out
    }

    /// Highest-scoring swap; the first one found wins ties
    pub fn best_move(&self, snapshot: &GridSnapshot) -> Option<ScoredMove> {
        let mut best: Option<ScoredMove> = None;
        for candidate in self.candidates(snapshot) {
            if best.map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        match best {
            Some(mv) => debug!(a = %mv.a, b = %mv.b, score = mv.score, "ai picked a swap"),
            None => debug!("ai found no scoring swap"),
        }
        best
    }

    /// Best swap for the live grid, evaluated on a snapshot
    pub fn evaluate(&self, grid: &Grid) -> Option<ScoredMove> {
        self.best_move(&grid.snapshot())
    }
}

impl Default for MoveEvaluator {
    fn default() -> Self {
        Self::new(&AiConfig::default(), &EffectTable::default())
    }
}
