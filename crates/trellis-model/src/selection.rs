use crate::{Axis, CellCoord, Grid, GridArea, TraversalOrder};

/// A resolved selection: a normalized, in-bounds rectangle plus derived
/// whole-axis flags.
///
/// Selections are recomputed per interaction against the current grid and
/// never persisted; the flags therefore never go stale.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    area: GridArea,
    all_rows: bool,
    all_cols: bool,
}

impl Selection {
    /// Resolve the rectangle spanned by two (possibly unordered,
    /// possibly out-of-bounds) corners against `grid`.
    pub fn resolve(grid: &Grid, a: CellCoord, b: CellCoord) -> Self {
        let clamp = |at: CellCoord| {
            CellCoord::new(at.row.min(grid.rows() - 1), at.col.min(grid.cols() - 1))
        };
        Self::from_area(grid, GridArea::new(clamp(a), clamp(b)))
    }

    /// Wrap an already in-bounds area, deriving the whole-axis flags.
    pub fn from_area(grid: &Grid, area: GridArea) -> Self {
        Self {
            area,
            all_rows: area.begin.row == 0 && area.end.row == grid.rows() - 1,
            all_cols: area.begin.col == 0 && area.end.col == grid.cols() - 1,
        }
    }

    #[inline]
    pub fn area(&self) -> GridArea {
        self.area
    }

    /// `true` iff the selection's row range covers every grid row (full
    /// height). Removing such a selection's rows would empty the table.
    #[inline]
    pub fn all_rows(&self) -> bool {
        self.all_rows
    }

    /// `true` iff the selection's column range covers every grid column
    /// (full width), i.e. whole rows are selected.
    #[inline]
    pub fn all_cols(&self) -> bool {
        self.all_cols
    }

    #[inline]
    pub fn is_single_cell(&self) -> bool {
        self.area.is_single_cell()
    }

    /// Grow `end` along `axis` until every anchor intersecting the area is
    /// fully included, then re-derive the flags.
    ///
    /// Computed to a fixed point against true anchor extents, so "remove 2
    /// rows" that clips a 3-row-tall merged cell operates on the cell's full
    /// extent rather than just the originally clicked cells.
    pub fn expand_to_spans(&mut self, grid: &Grid, axis: Axis) {
        let mut area = self.area;
        loop {
            let mut end = area.end;
            for at in area.coords(TraversalOrder::Forward) {
                let anchor_at = grid.anchor_coord(at);
                let anchor = grid.anchor(anchor_at);
                match axis {
                    Axis::Rows => {
                        end.row = end.row.max(anchor_at.row + anchor.row_span() - 1);
                    }
                    Axis::Cols => {
                        end.col = end.col.max(anchor_at.col + anchor.col_span() - 1);
                    }
                }
            }
            if end == area.end {
                break;
            }
            area.end = end;
        }
        *self = Self::from_area(grid, area);
    }

    /// [`Selection::expand_to_spans`], by value.
    pub fn expanded_to_spans(mut self, grid: &Grid, axis: Axis) -> Self {
        self.expand_to_spans(grid, axis);
        self
    }
}
