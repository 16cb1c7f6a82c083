use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Traversal order over an area's coordinates.
///
/// `Reverse` is the strict reverse of row-major order: descending row, then
/// descending column. It is mandatory whenever a command inserts or removes
/// underlying rows/columns mid-traversal — forward iteration over indices
/// invalidated by the mutation corrupts later offsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraversalOrder {
    Forward,
    Reverse,
}

/// A grid axis; structural operations and selection expansion are
/// parameterized over it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Cols,
}

/// A rectangular region of logical grid coordinates.
///
/// The area is inclusive and always normalized such that:
/// - `begin.row <= end.row`
/// - `begin.col <= end.col`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridArea {
    pub begin: CellCoord,
    pub end: CellCoord,
}

impl GridArea {
    /// Construct a new area, normalizing coordinates if needed.
    pub const fn new(a: CellCoord, b: CellCoord) -> Self {
        let begin_row = if a.row <= b.row { a.row } else { b.row };
        let end_row = if a.row <= b.row { b.row } else { a.row };
        let begin_col = if a.col <= b.col { a.col } else { b.col };
        let end_col = if a.col <= b.col { b.col } else { a.col };
        Self {
            begin: CellCoord::new(begin_row, begin_col),
            end: CellCoord::new(end_row, end_col),
        }
    }

    /// The 1x1 area covering a single coordinate.
    pub const fn single(at: CellCoord) -> Self {
        Self { begin: at, end: at }
    }

    #[inline]
    pub const fn row_count(&self) -> usize {
        self.end.row - self.begin.row + 1
    }

    #[inline]
    pub const fn col_count(&self) -> usize {
        self.end.col - self.begin.col + 1
    }

    #[inline]
    pub const fn is_single_cell(&self) -> bool {
        self.row_count() == 1 && self.col_count() == 1
    }

    pub fn contains(&self, at: CellCoord) -> bool {
        (self.begin.row..=self.end.row).contains(&at.row)
            && (self.begin.col..=self.end.col).contains(&at.col)
    }

    /// Materialize the area's coordinates in the requested order.
    ///
    /// The list is generated up front on purpose: commands that mutate the
    /// grid while walking an area must not iterate a collection they are
    /// changing, and the explicit list makes the ordering contract testable.
    pub fn coords(&self, order: TraversalOrder) -> std::vec::IntoIter<CellCoord> {
        let mut coords = Vec::with_capacity(self.row_count() * self.col_count());
        for row in self.begin.row..=self.end.row {
            for col in self.begin.col..=self.end.col {
                coords.push(CellCoord::new(row, col));
            }
        }
        if let TraversalOrder::Reverse = order {
            coords.reverse();
        }
        coords.into_iter()
    }
}
