//! Grid module - owns the gem arena
//!
//! The grid is a `width x height` arena of gem slots indexed by coordinate, stored
//! as a flat row-major vector. It is the sole owner of every live gem: other
//! components read it through coordinate queries or take a [`GridSnapshot`].
//!
//! Coordinates: (x, y) where x grows left to right and y grows bottom to top.
//! Gravity pulls gems toward row 0; refills enter from the top.
//!
//! The grid has no combat knowledge and never validates whether a swap forms a
//! match; that is the cascade resolver's job.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::matcher::KindView;
use crate::rng::SimpleRng;
use crate::snapshot::{GridSnapshot, LayoutError};
use crate::types::{Cell, Coord, GemType, MAX_GRID_EDGE, MIN_GRID_EDGE};

/// Stable identity of a gem, unique for the lifetime of one grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GemId(pub u32);

/// A live gem record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gem {
    pub id: GemId,
    pub kind: GemType,
    pub pos: Coord,
}

/// One gem dropping during compaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GemFall {
    pub id: GemId,
    pub kind: GemType,
    pub from: Coord,
    pub to: Coord,
}

/// Everything that moved or appeared during one gravity step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityReport {
    pub falls: Vec<GemFall>,
    pub spawned: Vec<Gem>,
}

/// The gem arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Row-major slots (y * width + x)
    slots: Vec<Option<Gem>>,
    next_id: u32,
}

impl Grid {
    /// Create an empty grid. Edges are clamped to the supported range.
    pub fn new(width: u8, height: u8) -> Self {
        let width = width.clamp(MIN_GRID_EDGE, MAX_GRID_EDGE);
        let height = height.clamp(MIN_GRID_EDGE, MAX_GRID_EDGE);
        Self {
            width,
            height,
            slots: vec![None; usize::from(width) * usize::from(height)],
            next_id: 0,
        }
    }

    /// Build a grid from a textual layout (top row first, `.` = empty)
    pub fn from_layout(rows: &[&str]) -> Result<Self, LayoutError> {
        let snapshot = GridSnapshot::from_layout(rows)?;
        Ok(Self::from_snapshot(&snapshot))
    }

    /// Build a grid holding fresh gems for every occupied snapshot cell
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Self {
        let mut grid = Self {
            width: snapshot.width(),
            height: snapshot.height(),
            slots: vec![None; snapshot.cells().len()],
            next_id: 0,
        };
        for y in 0..grid.height as i8 {
            for x in 0..grid.width as i8 {
                let at = Coord::new(x, y);
                if let Some(Some(kind)) = snapshot.get(at) {
                    grid.place_gem(at, kind);
                }
            }
        }
        grid
    }

    /// Calculate flat index from a coordinate
    #[inline(always)]
    fn index(&self, at: Coord) -> Option<usize> {
        if !self.is_within_bounds(at) {
            return None;
        }
        Some(at.y as usize * usize::from(self.width) + at.x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn is_within_bounds(&self, at: Coord) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as u8) < self.width && (at.y as u8) < self.height
    }

    /// Gem at `at`, if any
    pub fn get(&self, at: Coord) -> Option<&Gem> {
        self.index(at).and_then(|i| self.slots[i].as_ref())
    }

    /// Kind at `at`; None for empty or out-of-bounds cells
    pub fn kind_at(&self, at: Coord) -> Cell {
        self.get(at).map(|gem| gem.kind)
    }

    /// Whether `at` is inside the grid and holds no gem
    pub fn is_vacant(&self, at: Coord) -> bool {
        matches!(self.index(at), Some(i) if self.slots[i].is_none())
    }

    /// Create a gem at `at`.
    /// Returns None if the cell is out of bounds or already occupied.
    pub fn place_gem(&mut self, at: Coord, kind: GemType) -> Option<Gem> {
        let i = self.index(at)?;
        if self.slots[i].is_some() {
            return None;
        }
        let gem = Gem {
            id: GemId(self.next_id),
            kind,
            pos: at,
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.slots[i] = Some(gem);
        Some(gem)
    }

    /// Remove and return the gem at `at`
    pub fn remove_gem(&mut self, at: Coord) -> Option<Gem> {
        let i = self.index(at)?;
        self.slots[i].take()
    }

    /// Exchange the contents of two cells, keeping each gem's recorded position in sync.
    ///
    /// Purely structural: adjacency and match-forming are not checked here.
    /// Returns false (and changes nothing) if either cell is out of bounds.
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        self.slots.swap(ia, ib);
        if let Some(gem) = self.slots[ia].as_mut() {
            gem.pos = a;
        }
        if let Some(gem) = self.slots[ib].as_mut() {
            gem.pos = b;
        }
        true
    }

    /// Drop the gems of column `x` onto the lowest free rows, preserving their order.
    ///
    /// Returns the gems that actually moved.
    pub fn compact_column(&mut self, x: i8) -> Vec<GemFall> {
        let mut falls = Vec::new();
        if x < 0 || x as u8 >= self.width {
            return falls;
        }

        // Two-pointer sweep from the bottom up.
        let mut write_y: i8 = 0;
        for read_y in 0..self.height as i8 {
            let from = Coord::new(x, read_y);
            let Some(mut gem) = self.remove_gem(from) else {
                continue;
            };
            let to = Coord::new(x, write_y);
            gem.pos = to;
            if let Some(i) = self.index(to) {
                self.slots[i] = Some(gem);
            }
            if read_y != write_y {
                falls.push(GemFall {
                    id: gem.id,
                    kind: gem.kind,
                    from,
                    to,
                });
            }
            write_y += 1;
        }
        falls
    }

    /// Fill every empty cell of column `x` at or above `from_row` with new gems.
    ///
    /// Each draw avoids the kind that would complete a run of three with the two
    /// cells directly below or directly to the left, when those exist.
    pub fn refill_column(&mut self, x: i8, from_row: i8, rng: &mut SimpleRng) -> Vec<Gem> {
        let mut spawned = Vec::new();
        if x < 0 || x as u8 >= self.width {
            return spawned;
        }
        for y in from_row.max(0)..self.height as i8 {
            let at = Coord::new(x, y);
            if !self.is_vacant(at) {
                continue;
            }
            let excluded = self.run_completing_kinds(at);
            let kind = rng.draw_kind(&excluded);
            if let Some(gem) = self.place_gem(at, kind) {
                spawned.push(gem);
            }
        }
        spawned
    }

    /// Compact and refill every column, left to right
    pub fn gravity(&mut self, rng: &mut SimpleRng) -> GravityReport {
        let mut report = GravityReport::default();
        for x in 0..self.width as i8 {
            report.falls.extend(self.compact_column(x));
            let first_free = (0..self.height as i8)
                .find(|&y| self.is_vacant(Coord::new(x, y)))
                .unwrap_or(self.height as i8);
            report
                .spawned
                .extend(self.refill_column(x, first_free, rng));
        }
        report
    }

    /// Fill every empty cell, column by column from the bottom.
    ///
    /// Because each draw excludes run-completing kinds and the cells to the left
    /// and below are always filled first, a populated empty grid has no standing match.
    pub fn populate(&mut self, rng: &mut SimpleRng) -> Vec<Gem> {
        let mut spawned = Vec::new();
        for x in 0..self.width as i8 {
            spawned.extend(self.refill_column(x, 0, rng));
        }
        spawned
    }

    /// Kinds that would complete a run of three ending at `at`
    fn run_completing_kinds(&self, at: Coord) -> ArrayVec<GemType, 2> {
        let mut excluded = ArrayVec::new();
        let pairs = [
            (at.offset(-1, 0), at.offset(-2, 0)),
            (at.offset(0, -1), at.offset(0, -2)),
        ];
        for (near, far) in pairs {
            if let (Some(a), Some(b)) = (self.kind_at(near), self.kind_at(far)) {
                if a == b && !excluded.contains(&a) {
                    excluded.push(a);
                }
            }
        }
        excluded
    }

    /// Iterate live gems in row-major order
    pub fn gems(&self) -> impl Iterator<Item = &Gem> {
        self.slots.iter().flatten()
    }

    /// Number of live gems
    pub fn gem_count(&self) -> usize {
        self.gems().count()
    }

    /// Whether every cell holds a gem
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Remove every gem
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Type-only value copy of the grid
    pub fn snapshot(&self) -> GridSnapshot {
        let mut snapshot = GridSnapshot::new(self.width, self.height);
        for gem in self.gems() {
            snapshot.set(gem.pos, Some(gem.kind));
        }
        snapshot
    }

    /// Verify the arena invariant: every gem records its own slot and ids are unique
    pub fn check_integrity(&self) -> bool {
        let mut ids: Vec<GemId> = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(gem) = slot else {
                continue;
            };
            if self.index(gem.pos) != Some(i) {
                return false;
            }
            ids.push(gem.id);
        }
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        ids.len() == total
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(crate::types::GRID_WIDTH, crate::types::GRID_HEIGHT)
    }
}

impl KindView for Grid {
    fn width(&self) -> u8 {
        self.width
    }

    fn height(&self) -> u8 {
        self.height
    }

    fn kind_at(&self, at: Coord) -> Cell {
        Grid::kind_at(self, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(8, 8);
        assert_eq!(grid.index(Coord::new(0, 0)), Some(0));
        assert_eq!(grid.index(Coord::new(7, 0)), Some(7));
        assert_eq!(grid.index(Coord::new(0, 1)), Some(8));
        assert_eq!(grid.index(Coord::new(7, 7)), Some(63));
        assert_eq!(grid.index(Coord::new(-1, 0)), None);
        assert_eq!(grid.index(Coord::new(8, 0)), None);
        assert_eq!(grid.index(Coord::new(0, 8)), None);
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut grid = Grid::new(4, 4);
        let first = grid.place_gem(Coord::new(1, 1), GemType::Red);
        assert!(first.is_some());
        assert!(grid.place_gem(Coord::new(1, 1), GemType::Blue).is_none());
        assert_eq!(grid.kind_at(Coord::new(1, 1)), Some(GemType::Red));
        assert!(grid.place_gem(Coord::new(4, 1), GemType::Blue).is_none());
    }

    #[test]
    fn test_swap_updates_positions() {
        let mut grid = Grid::from_layout(&["RB.", "GYX"]).unwrap();
        let red = *grid.get(Coord::new(0, 1)).unwrap();

        assert!(grid.swap(Coord::new(0, 1), Coord::new(1, 1)));
        let moved = grid.get(Coord::new(1, 1)).unwrap();
        assert_eq!(moved.id, red.id);
        assert_eq!(moved.pos, Coord::new(1, 1));

        // Swapping with an empty cell moves the gem into it.
        assert!(grid.swap(Coord::new(1, 1), Coord::new(2, 1)));
        assert!(grid.is_vacant(Coord::new(1, 1)));
        assert_eq!(grid.get(Coord::new(2, 1)).unwrap().pos, Coord::new(2, 1));
        assert!(grid.check_integrity());
    }

    #[test]
    fn test_compact_preserves_order() {
        let mut grid = Grid::from_layout(&["R", ".", "B", ".", "G"]).unwrap();
        let falls = grid.compact_column(0);

        assert_eq!(grid.kind_at(Coord::new(0, 0)), Some(GemType::Green));
        assert_eq!(grid.kind_at(Coord::new(0, 1)), Some(GemType::Blue));
        assert_eq!(grid.kind_at(Coord::new(0, 2)), Some(GemType::Red));
        assert!(grid.is_vacant(Coord::new(0, 3)));
        assert!(grid.is_vacant(Coord::new(0, 4)));

        assert_eq!(falls.len(), 2);
        assert_eq!(falls[0].from, Coord::new(0, 2));
        assert_eq!(falls[0].to, Coord::new(0, 1));
        assert_eq!(falls[1].from, Coord::new(0, 4));
        assert_eq!(falls[1].to, Coord::new(0, 2));
        assert!(grid.check_integrity());
    }

    #[test]
    fn test_refill_avoids_vertical_run() {
        let mut rng = SimpleRng::new(11);
        for _ in 0..50 {
            let mut grid = Grid::from_layout(&[".", ".", "Y", "Y"]).unwrap();
            let spawned = grid.refill_column(0, 2, &mut rng);
            assert_eq!(spawned.len(), 2);
            assert_ne!(grid.kind_at(Coord::new(0, 2)), Some(GemType::Yellow));
        }
    }

    #[test]
    fn test_run_completing_kinds() {
        let grid = Grid::from_layout(&["...", "B..", "BRR"]).unwrap();
        let excluded = grid.run_completing_kinds(Coord::new(0, 2));
        assert_eq!(excluded.as_slice(), &[GemType::Blue]);

        let grid = Grid::from_layout(&["....", "RR..", "BRRG"]).unwrap();
        let excluded = grid.run_completing_kinds(Coord::new(2, 1));
        assert_eq!(excluded.as_slice(), &[GemType::Red]);
    }

    #[test]
    fn test_ids_are_unique_after_gravity() {
        let mut rng = SimpleRng::new(21);
        let mut grid = Grid::new(6, 6);
        grid.populate(&mut rng);
        for x in 0..6 {
            grid.remove_gem(Coord::new(x, 2));
        }
        let report = grid.gravity(&mut rng);
        assert_eq!(report.spawned.len(), 6);
        assert_eq!(report.falls.len(), 18);
        assert!(grid.is_full());
        assert!(grid.check_integrity());
    }
}
