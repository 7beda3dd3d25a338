//! Type-only grid snapshots
//!
//! A [`GridSnapshot`] is a plain value copy of the grid: one optional gem kind per
//! cell, no gem identity. The AI simulates swaps on it and observers receive it,
//! so nothing outside the grid ever holds a reference into the live arena.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::KindView;
use crate::types::{Cell, Coord, GemType, MAX_GRID_EDGE};

/// Errors raised while parsing a textual grid layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,
    #[error("layout is {width}x{height}, the largest supported edge is {max}")]
    TooLarge { width: usize, height: usize, max: u8 },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        row: usize,
        column: usize,
        symbol: char,
    },
}

/// Value copy of a grid, row-major with row 0 at the bottom
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSnapshot {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl GridSnapshot {
    /// Create an empty snapshot
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; usize::from(width) * usize::from(height)],
        }
    }

    /// Parse a layout given top row first.
    ///
    /// Each row is a string of gem symbols (`R B G Y P X`) or `.` for an empty cell;
    /// whitespace is ignored.
    pub fn from_layout(rows: &[&str]) -> Result<Self, LayoutError> {
        let parsed: Vec<Vec<char>> = rows
            .iter()
            .map(|row| row.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();

        let height = parsed.len();
        let width = parsed.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LayoutError::Empty);
        }
        if width > usize::from(MAX_GRID_EDGE) || height > usize::from(MAX_GRID_EDGE) {
            return Err(LayoutError::TooLarge {
                width,
                height,
                max: MAX_GRID_EDGE,
            });
        }

        let mut snapshot = Self::new(width as u8, height as u8);
        for (row, symbols) in parsed.iter().enumerate() {
            if symbols.len() != width {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: width,
                    found: symbols.len(),
                });
            }
            let y = (height - 1 - row) as i8;
            for (column, &symbol) in symbols.iter().enumerate() {
                let cell = match symbol {
                    '.' => None,
                    other => Some(GemType::from_symbol(other).ok_or(
                        LayoutError::UnknownSymbol {
                            row,
                            column,
                            symbol: other,
                        },
                    )?),
                };
                snapshot.set(Coord::new(column as i8, y), cell);
            }
        }
        Ok(snapshot)
    }

    /// Render back to layout rows, top row first
    pub fn to_layout(&self) -> Vec<String> {
        (0..self.height as i8)
            .rev()
            .map(|y| {
                (0..self.width as i8)
                    .map(|x| match self.get(Coord::new(x, y)).flatten() {
                        Some(kind) => kind.symbol(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    #[inline]
    fn index(&self, at: Coord) -> Option<usize> {
        if at.x < 0 || at.y < 0 || at.x as u8 >= self.width || at.y as u8 >= self.height {
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

    /// Get cell at `at`; None if out of bounds
    pub fn get(&self, at: Coord) -> Option<Cell> {
        self.index(at).map(|i| self.cells[i])
    }

    /// Set cell at `at`; returns false if out of bounds
    pub fn set(&mut self, at: Coord, cell: Cell) -> bool {
        match self.index(at) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells; returns false if either is out of bounds
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Row-major cells, row 0 at the bottom
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells holding `kind`
    pub fn count(&self, kind: GemType) -> usize {
        self.cells.iter().filter(|c| **c == Some(kind)).count()
    }

    /// Number of empty cells
    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }
}

impl KindView for GridSnapshot {
    fn width(&self) -> u8 {
        self.width
    }

    fn height(&self) -> u8 {
        self.height
    }

    fn kind_at(&self, at: Coord) -> Cell {
        self.get(at).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_orientation() {
        let snap = GridSnapshot::from_layout(&["RB.", "GYX"]).unwrap();
        assert_eq!(snap.width(), 3);
        assert_eq!(snap.height(), 2);
        // Bottom row is the last layout row.
        assert_eq!(snap.get(Coord::new(0, 0)), Some(Some(GemType::Green)));
        assert_eq!(snap.get(Coord::new(2, 0)), Some(Some(GemType::Grey)));
        assert_eq!(snap.get(Coord::new(0, 1)), Some(Some(GemType::Red)));
        assert_eq!(snap.get(Coord::new(2, 1)), Some(None));
        assert_eq!(snap.get(Coord::new(3, 0)), None);
    }

    #[test]
    fn test_layout_roundtrip_text() {
        let rows = ["RB.P", "GYXR", "...."];
        let snap = GridSnapshot::from_layout(&rows).unwrap();
        assert_eq!(snap.to_layout(), rows.to_vec());
        assert_eq!(snap.empty_cells(), 5);
        assert_eq!(snap.count(GemType::Red), 2);
    }

    #[test]
    fn test_layout_errors() {
        assert_eq!(GridSnapshot::from_layout(&[]), Err(LayoutError::Empty));
        assert_eq!(
            GridSnapshot::from_layout(&["RRR", "RR"]),
            Err(LayoutError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            GridSnapshot::from_layout(&["RQR"]),
            Err(LayoutError::UnknownSymbol {
                row: 0,
                column: 1,
                symbol: 'Q'
            })
        );
    }

    #[test]
    fn test_swap_out_of_bounds_is_noop() {
        let mut snap = GridSnapshot::from_layout(&["RB"]).unwrap();
        let before = snap.clone();
        assert!(!snap.swap(Coord::new(0, 0), Coord::new(-1, 0)));
        assert_eq!(snap, before);
        assert!(snap.swap(Coord::new(0, 0), Coord::new(1, 0)));
        assert_eq!(snap.to_layout(), vec!["BR".to_string()]);
    }
}
