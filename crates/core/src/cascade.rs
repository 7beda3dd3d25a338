//! Cascade resolution
//!
//! A swap attempt moves through `Idle -> Swapping -> Validating` and then either
//! `RevertingSwap -> Idle` (no match formed, nothing else happens) or
//! `Resolving -> Idle`. While resolving, every pass removes the union of the
//! pass's match groups, compacts and refills the grid, and re-runs detection.
//! The cascade settles on the first pass whose re-detection comes back empty.
//!
//! Each pass is recorded in order; the full [`CascadeReport`] is what the combat
//! calculator and observers consume once the cascade has settled.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::grid::{Gem, GemFall, Grid};
use crate::matcher::{find_matches, union_cells, MatchGroup};
use crate::rng::SimpleRng;
use crate::types::Coord;

/// Upper bound on passes per cascade
pub const MAX_CASCADE_PASSES: usize = 256;

/// Resolver phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CascadePhase {
    Idle,
    Swapping,
    Validating,
    Resolving,
    RevertingSwap,
}

/// Why a swap request was refused before touching the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum SwapRejection {
    #[error("cell {at} is outside the grid")]
    OutOfBounds { at: Coord },
    #[error("cell {at} holds no gem")]
    EmptyCell { at: Coord },
    #[error("cells {a} and {b} are not adjacent")]
    NotAdjacent { a: Coord, b: Coord },
    #[error("a cascade is still resolving")]
    Busy,
}

/// Result of the validation step of an accepted swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapVerdict {
    /// No match formed; the swap was undone
    Reverted,
    /// The swap formed `groups` match groups; the resolver is now resolving
    Matched { groups: usize },
}

/// One remove -> compact -> refill -> detect cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadePass {
    /// Zero-based pass number within the cascade
    pub index: usize,
    pub groups: Vec<MatchGroup>,
    pub destroyed: Vec<Gem>,
    pub falls: Vec<GemFall>,
    pub spawned: Vec<Gem>,
}

/// Every pass of one settled cascade, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub swap: Option<(Coord, Coord)>,
    pub passes: Vec<CascadePass>,
    /// Set when the pass ceiling cut the cascade short
    pub truncated: bool,
}

impl CascadeReport {
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Match groups of each pass, in resolution order
    pub fn batches(&self) -> impl Iterator<Item = &[MatchGroup]> {
        self.passes.iter().map(|p| p.groups.as_slice())
    }

    /// Every match group of the cascade, flattened in resolution order
    pub fn all_groups(&self) -> Vec<MatchGroup> {
        self.passes
            .iter()
            .flat_map(|p| p.groups.iter().cloned())
            .collect()
    }

    /// Total gems destroyed across all passes
    pub fn destroyed_count(&self) -> usize {
        self.passes.iter().map(|p| p.destroyed.len()).sum()
    }
}

/// Outcome of a fully resolved swap attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Reverted,
    Resolved(CascadeReport),
}

/// Drives swap validation and cascade passes over a grid it does not own
#[derive(Debug, Clone)]
pub struct CascadeResolver {
    phase: CascadePhase,
    pending: Vec<MatchGroup>,
    report: CascadeReport,
}

impl CascadeResolver {
    pub fn new() -> Self {
        Self {
            phase: CascadePhase::Idle,
            pending: Vec::new(),
            report: CascadeReport::default(),
        }
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == CascadePhase::Idle
    }

    /// Validate, perform and check a swap.
    ///
    /// Rejections leave the grid untouched. A swap that forms no match is undone
    /// and reported as [`SwapVerdict::Reverted`]; otherwise the resolver enters
    /// `Resolving` and [`step`](Self::step) / [`resolve`](Self::resolve) take over.
    pub fn request_swap(
        &mut self,
        grid: &mut Grid,
        a: Coord,
        b: Coord,
    ) -> Result<SwapVerdict, SwapRejection> {
        if !self.is_idle() {
            return Err(SwapRejection::Busy);
        }
        for at in [a, b] {
            if !grid.is_within_bounds(at) {
                return Err(SwapRejection::OutOfBounds { at });
            }
            if grid.get(at).is_none() {
                return Err(SwapRejection::EmptyCell { at });
            }
        }
        if !a.is_adjacent(b) {
            return Err(SwapRejection::NotAdjacent { a, b });
        }

        self.phase = CascadePhase::Swapping;
        grid.swap(a, b);

        self.phase = CascadePhase::Validating;
        let groups = find_matches(grid);

        if groups.is_empty() {
            self.phase = CascadePhase::RevertingSwap;
            grid.swap(a, b);
            self.phase = CascadePhase::Idle;
            debug!(%a, %b, "swap formed no match, reverted");
            return Ok(SwapVerdict::Reverted);
        }

        let count = groups.len();
        self.begin(groups, Some((a, b)));
        Ok(SwapVerdict::Matched { groups: count })
    }

    /// Start resolving matches already standing on the grid (e.g. a fresh board).
    ///
    /// Returns false if there is nothing to resolve or the resolver is busy.
    pub fn begin_standing(&mut self, grid: &Grid) -> bool {
        if !self.is_idle() {
            return false;
        }
        let groups = find_matches(grid);
        if groups.is_empty() {
            return false;
        }
        self.begin(groups, None);
        true
    }

    fn begin(&mut self, groups: Vec<MatchGroup>, swap: Option<(Coord, Coord)>) {
        self.pending = groups;
        self.report = CascadeReport {
            swap,
            passes: Vec::new(),
            truncated: false,
        };
        self.phase = CascadePhase::Resolving;
    }

    /// Run one pass. Returns None unless the resolver is resolving.
    pub fn step(&mut self, grid: &mut Grid, rng: &mut SimpleRng) -> Option<CascadePass> {
        if self.phase != CascadePhase::Resolving {
            return None;
        }

        let groups = std::mem::take(&mut self.pending);
        let destroyed: Vec<Gem> = union_cells(&groups)
            .into_iter()
            .filter_map(|at| grid.remove_gem(at))
            .collect();
        let gravity = grid.gravity(rng);

        let pass = CascadePass {
            index: self.report.passes.len(),
            groups,
            destroyed,
            falls: gravity.falls,
            spawned: gravity.spawned,
        };
        debug!(
            pass = pass.index,
            groups = pass.groups.len(),
            destroyed = pass.destroyed.len(),
            spawned = pass.spawned.len(),
            "cascade pass resolved"
        );
        self.report.passes.push(pass.clone());

        let next = find_matches(grid);
        if next.is_empty() {
            self.phase = CascadePhase::Idle;
        } else if self.report.passes.len() >= MAX_CASCADE_PASSES {
            warn!(
                passes = self.report.passes.len(),
                "cascade hit the pass ceiling, leaving matches on the grid"
            );
            self.report.truncated = true;
            self.phase = CascadePhase::Idle;
        } else {
            self.pending = next;
        }
        Some(pass)
    }

    /// Run passes until the cascade settles and hand back the full report
    pub fn resolve(&mut self, grid: &mut Grid, rng: &mut SimpleRng) -> CascadeReport {
        while self.step(grid, rng).is_some() {}
        std::mem::take(&mut self.report)
    }

    /// Resolve any matches standing on the grid, without a swap
    pub fn clear_standing_matches(
        &mut self,
        grid: &mut Grid,
        rng: &mut SimpleRng,
    ) -> CascadeReport {
        if !self.begin_standing(grid) {
            return CascadeReport::default();
        }
        self.resolve(grid, rng)
    }
}

impl Default for CascadeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a swap and, when it matches, resolve the whole cascade
pub fn resolve_swap(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    a: Coord,
    b: Coord,
) -> Result<SwapOutcome, SwapRejection> {
    let mut resolver = CascadeResolver::new();
    match resolver.request_swap(grid, a, b)? {
        SwapVerdict::Reverted => Ok(SwapOutcome::Reverted),
        SwapVerdict::Matched { .. } => Ok(SwapOutcome::Resolved(resolver.resolve(grid, rng))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::has_match;
    use crate::types::GemType;

    #[test]
    fn test_non_matching_swap_reverts() {
        let mut grid = Grid::from_layout(&["RGB", "GBR", "BRG"]).unwrap();
        let before = grid.clone();
        let mut resolver = CascadeResolver::new();

        let verdict = resolver.request_swap(&mut grid, Coord::new(0, 0), Coord::new(1, 0));
        assert_eq!(verdict, Ok(SwapVerdict::Reverted));
        assert_eq!(grid, before);
        assert!(resolver.is_idle());
    }

    #[test]
    fn test_rejections_leave_grid_untouched() {
        let mut grid = Grid::from_layout(&["RG.", "GBR", "BRG"]).unwrap();
        let before = grid.clone();
        let mut resolver = CascadeResolver::new();

        assert_eq!(
            resolver.request_swap(&mut grid, Coord::new(0, 0), Coord::new(2, 0)),
            Err(SwapRejection::NotAdjacent {
                a: Coord::new(0, 0),
                b: Coord::new(2, 0)
            })
        );
        assert_eq!(
            resolver.request_swap(&mut grid, Coord::new(1, 2), Coord::new(2, 2)),
            Err(SwapRejection::EmptyCell {
                at: Coord::new(2, 2)
            })
        );
        assert_eq!(
            resolver.request_swap(&mut grid, Coord::new(0, 0), Coord::new(-1, 0)),
            Err(SwapRejection::OutOfBounds {
                at: Coord::new(-1, 0)
            })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_matching_swap_enters_resolving() {
        // Swapping (2,0)<->(2,1) lines up three reds on the bottom row.
        let mut grid = Grid::from_layout(&["GBYP", "BGRY", "RRGB"]).unwrap();
        let mut resolver = CascadeResolver::new();

        let verdict = resolver.request_swap(&mut grid, Coord::new(2, 0), Coord::new(2, 1));
        assert_eq!(verdict, Ok(SwapVerdict::Matched { groups: 1 }));
        assert_eq!(resolver.phase(), CascadePhase::Resolving);
        assert_eq!(
            resolver.request_swap(&mut grid, Coord::new(0, 2), Coord::new(1, 2)),
            Err(SwapRejection::Busy)
        );

        let mut rng = SimpleRng::new(3);
        let report = resolver.resolve(&mut grid, &mut rng);
        assert!(resolver.is_idle());
        assert!(!report.is_empty());
        assert_eq!(report.passes[0].groups[0].kind, GemType::Red);
        assert_eq!(report.passes[0].destroyed.len(), 3);
        assert!(grid.is_full());
        assert!(!has_match(&grid));
        assert!(grid.check_integrity());
    }

    #[test]
    fn test_clear_standing_matches_settles_board() {
        let mut grid = Grid::from_layout(&["YYYB", "BGRG", "RRRB"]).unwrap();
        let mut resolver = CascadeResolver::new();
        let mut rng = SimpleRng::new(17);

        let report = resolver.clear_standing_matches(&mut grid, &mut rng);
        assert!(report.swap.is_none());
        assert_eq!(report.passes[0].groups.len(), 2);
        assert!(!has_match(&grid));
        assert!(grid.is_full());
    }

    #[test]
    fn test_step_is_noop_when_idle() {
        let mut grid = Grid::from_layout(&["RGB"]).unwrap();
        let mut resolver = CascadeResolver::new();
        let mut rng = SimpleRng::new(1);
        assert!(resolver.step(&mut grid, &mut rng).is_none());
    }
}
