//! Match detection
//!
//! Scans a grid for straight runs of at least [`MIN_MATCH_LEN`] gems of one kind,
//! rows first (left to right) then columns (bottom to top), and merges runs that
//! share a cell into a single group. That merge is what turns T, L and cross
//! shapes into one match instead of two overlapping ones.
//!
//! Detection only needs read access to cell kinds, so it runs on the live
//! [`Grid`](crate::grid::Grid) and on type-only
//! [`GridSnapshot`](crate::snapshot::GridSnapshot) copies alike.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Cell, Coord, GemType, MIN_MATCH_LEN};

/// Read-only access to cell kinds
pub trait KindView {
    fn width(&self) -> u8;
    fn height(&self) -> u8;
    /// Kind at `at`; None for empty or out-of-bounds cells
    fn kind_at(&self, at: Coord) -> Cell;
}

/// A connected set of same-kind cells, size >= 3
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchGroup {
    pub kind: GemType,
    /// Sorted, without duplicates
    cells: Vec<Coord>,
}

impl MatchGroup {
    /// Build a group from cells; the cell list is sorted and de-duplicated
    pub fn new(kind: GemType, cells: impl IntoIterator<Item = Coord>) -> Self {
        let cells: BTreeSet<Coord> = cells.into_iter().collect();
        Self {
            kind,
            cells: cells.into_iter().collect(),
        }
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.cells.binary_search(&at).is_ok()
    }

    /// Effect multiplier for this group's size
    pub fn multiplier(&self) -> u32 {
        size_multiplier(self.len())
    }

    fn overlaps(&self, other: &MatchGroup) -> bool {
        self.cells.iter().any(|c| other.contains(*c))
    }
}

/// Linear size multiplier: 3 -> x1, 4 -> x2, 5 -> x3, ...
pub fn size_multiplier(size: usize) -> u32 {
    let extra = size.saturating_sub(MIN_MATCH_LEN) as u32;
    1 + extra
}

/// Straight runs of length >= 3, horizontal runs first, unmerged
pub fn scan_runs<V: KindView + ?Sized>(view: &V) -> Vec<MatchGroup> {
    let width = view.width() as i8;
    let height = view.height() as i8;
    let mut runs = Vec::new();

    for y in 0..height {
        collect_runs(view, (0..width).map(|x| Coord::new(x, y)), &mut runs);
    }
    for x in 0..width {
        collect_runs(view, (0..height).map(|y| Coord::new(x, y)), &mut runs);
    }
    runs
}

/// Walk one line of cells, emitting every qualifying run
fn collect_runs<V: KindView + ?Sized>(
    view: &V,
    line: impl Iterator<Item = Coord>,
    out: &mut Vec<MatchGroup>,
) {
    let mut run: Vec<Coord> = Vec::new();
    let mut run_kind: Option<GemType> = None;

    for at in line {
        let kind = view.kind_at(at);
        if kind.is_some() && kind == run_kind {
            run.push(at);
            continue;
        }
        // Run broken by a different kind or an empty cell.
        flush_run(run_kind, &mut run, out);
        run_kind = kind;
        if kind.is_some() {
            run.push(at);
        }
    }
    flush_run(run_kind, &mut run, out);
}

fn flush_run(kind: Option<GemType>, run: &mut Vec<Coord>, out: &mut Vec<MatchGroup>) {
    if let Some(kind) = kind {
        if run.len() >= MIN_MATCH_LEN {
            out.push(MatchGroup::new(kind, run.iter().copied()));
        }
    }
    run.clear();
}

/// Union groups sharing any cell until no two groups overlap.
///
/// Idempotent: merging already disjoint groups returns them unchanged.
pub fn merge_groups(groups: Vec<MatchGroup>) -> Vec<MatchGroup> {
    let mut merged: Vec<MatchGroup> = groups;

    loop {
        let mut changed = false;
        let mut i = 0;
        while i < merged.len() {
            let mut j = i + 1;
            while j < merged.len() {
                if merged[i].overlaps(&merged[j]) {
                    let absorbed = merged.remove(j);
                    let kind = merged[i].kind;
                    let mut cells = merged[i].cells.clone();
                    cells.extend(absorbed.cells);
                    merged[i] = MatchGroup::new(kind, cells);
                    changed = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        if !changed {
            return merged;
        }
    }
}

/// Detect every match on the view as disjoint groups
pub fn find_matches<V: KindView + ?Sized>(view: &V) -> Vec<MatchGroup> {
    merge_groups(scan_runs(view))
}

/// Whether the view holds at least one match
pub fn has_match<V: KindView + ?Sized>(view: &V) -> bool {
    !scan_runs(view).is_empty()
}

/// Union of every cell in `groups`, sorted
pub fn union_cells(groups: &[MatchGroup]) -> Vec<Coord> {
    let cells: BTreeSet<Coord> = groups.iter().flat_map(|g| g.cells.iter().copied()).collect();
    cells.into_iter().collect()
}
