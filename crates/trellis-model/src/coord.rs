use core::fmt;

use serde::{Deserialize, Serialize};

/// A logical coordinate within a table grid.
///
/// Rows and columns are **0-indexed** and address the logical matrix, not
/// physical renderer elements: a placeholder covered by a merged cell still
/// has its own coordinate.
///
/// Ordering is row-major (`row` first, then `col`), which is also the
/// forward traversal order of [`crate::GridArea::coords`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    /// 0-indexed row.
    pub row: usize,
    /// 0-indexed column.
    pub col: usize,
}

impl CellCoord {
    /// Construct a new [`CellCoord`].
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Mirror the coordinate across the main diagonal (`row` and `col`
    /// swapped). Column-axis grid operations are the row-axis operations run
    /// on a transposed grid, and use this to map coordinates back.
    #[inline]
    pub const fn transposed(self) -> Self {
        Self {
            row: self.col,
            col: self.row,
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}
