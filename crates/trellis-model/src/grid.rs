use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AnchorCell, Cell, CellCoord, GridArea, TraversalOrder};

/// Errors returned by grid mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("coordinate {at} is outside the grid")]
    OutOfBounds { at: CellCoord },
    #[error("cell at {at} is not an anchor")]
    NotAnAnchor { at: CellCoord },
    #[error("cell at {at} is not a placeholder")]
    NotAPlaceholder { at: CellCoord },
    #[error("span would bisect the cell covering {at}")]
    SpanCollision { at: CellCoord },
    #[error("spans must be at least 1x1")]
    ZeroSpan,
    #[error("row/column range is empty")]
    EmptyRange,
    #[error("removal would leave a zero-dimension grid")]
    WouldEmptyGrid,
}

/// A violation of the grid's structural invariants.
///
/// Only reachable through deserialization of untrusted payloads (mutators
/// restore the invariants before returning); [`Grid::check_invariants`] is
/// also what the test suites call after every command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("grid dimensions must be at least 1x1")]
    ZeroDimension,
    #[error("cell count {found} does not match {expected} (rows x cols)")]
    CellCountMismatch { expected: usize, found: usize },
    #[error("anchor at {at} declares a zero span")]
    ZeroSpan { at: CellCoord },
    #[error("anchor at {at} spans past the grid edge")]
    SpanOutOfBounds { at: CellCoord },
    #[error("coordinate {at} is covered by more than one anchor")]
    SpanOverlap { at: CellCoord },
    #[error("placeholder at {at} is not covered by its parent {parent}")]
    BadPlaceholder { at: CellCoord, parent: CellCoord },
}

/// Report of a row insertion; the edit engine turns it into render intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowInsertion {
    /// First logical index of the inserted row range.
    pub index: usize,
    pub count: usize,
    /// Anchors whose `row_span` grew because the insertion line crossed them.
    pub extended: Vec<CellCoord>,
    /// Fresh independent anchors created in the inserted rows.
    pub created: Vec<CellCoord>,
}

/// Report of a row removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRemoval {
    /// First removed row index (pre-removal coordinates).
    pub index: usize,
    pub count: usize,
    /// Anchors above the removed band whose `row_span` shrank.
    pub resized: Vec<CellCoord>,
    /// Anchors that started inside the band but extended past it: the tail
    /// survives as a replacement anchor. `(old, new)` coordinates, with the
    /// original content moved into the replacement.
    pub relocated: Vec<(CellCoord, CellCoord)>,
}

/// Column-axis counterpart of [`RowInsertion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColInsertion {
    pub index: usize,
    pub count: usize,
    pub extended: Vec<CellCoord>,
    pub created: Vec<CellCoord>,
}

/// Column-axis counterpart of [`RowRemoval`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColRemoval {
    pub index: usize,
    pub count: usize,
    pub resized: Vec<CellCoord>,
    pub relocated: Vec<(CellCoord, CellCoord)>,
}

/// The logical table matrix: a dense `rows x cols` arena of [`Cell`]s in
/// row-major order.
///
/// Placeholders store their anchor's coordinate rather than a live
/// reference, so no mutator can leave a dangling pointer — structural
/// operations remap parents as part of the edit.
///
/// Deserialization validates the dimensions and all structural invariants
/// and rejects malformed payloads; a zero-dimension grid is unrepresentable
/// through the public API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct GridRepr {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = InvariantViolation;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        let grid = Grid {
            rows: repr.rows,
            cols: repr.cols,
            cells: repr.cells,
        };
        grid.check_invariants()?;
        Ok(grid)
    }
}

impl Grid {
    /// A `rows x cols` grid of empty 1x1 cells.
    ///
    /// # Panics
    /// Panics if either dimension is zero; callers construct grids from
    /// parsed tables which always have at least one row and column.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1 && cols >= 1, "grid dimensions must be >= 1x1");
        Self {
            rows,
            cols,
            cells: (0..rows * cols).map(|_| Cell::Anchor(AnchorCell::new())).collect(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The area covering the whole grid.
    pub fn full_area(&self) -> GridArea {
        GridArea::new(
            CellCoord::new(0, 0),
            CellCoord::new(self.rows - 1, self.cols - 1),
        )
    }

    #[inline]
    pub fn contains(&self, at: CellCoord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    #[inline]
    fn idx(&self, at: CellCoord) -> usize {
        at.row * self.cols + at.col
    }

    #[inline]
    fn coord_of(&self, idx: usize) -> CellCoord {
        CellCoord::new(idx / self.cols, idx % self.cols)
    }

    /// The cell at `at`.
    ///
    /// # Panics
    /// Panics if `at` is out of bounds; use [`Grid::get`] for untrusted
    /// coordinates.
    pub fn cell(&self, at: CellCoord) -> &Cell {
        assert!(self.contains(at), "coordinate {at} is outside the grid");
        &self.cells[self.idx(at)]
    }

    pub fn get(&self, at: CellCoord) -> Option<&Cell> {
        self.contains(at).then(|| &self.cells[self.idx(at)])
    }

    pub fn is_placeholder(&self, at: CellCoord) -> bool {
        self.cell(at).is_placeholder()
    }

    /// Resolve a coordinate to the anchor covering it: identity for anchor
    /// coordinates, one hop through `parent` for placeholders.
    pub fn anchor_coord(&self, at: CellCoord) -> CellCoord {
        match self.cell(at) {
            Cell::Anchor(_) => at,
            Cell::Placeholder { parent } => *parent,
        }
    }

    /// The anchor cell covering `at`.
    pub fn anchor(&self, at: CellCoord) -> &AnchorCell {
        let anchor_at = self.anchor_coord(at);
        match self.cell(anchor_at) {
            Cell::Anchor(anchor) => anchor,
            // A placeholder's parent is an anchor by invariant; mutators
            // restore this before returning.
            Cell::Placeholder { .. } => unreachable!("placeholder parent must be an anchor"),
        }
    }

    /// Mutable access to the anchor cell covering `at`.
    pub fn anchor_mut(&mut self, at: CellCoord) -> &mut AnchorCell {
        let anchor_at = self.anchor_coord(at);
        let idx = self.idx(anchor_at);
        match &mut self.cells[idx] {
            Cell::Anchor(anchor) => anchor,
            Cell::Placeholder { .. } => unreachable!("placeholder parent must be an anchor"),
        }
    }

    /// The rectangle covered by the anchor at (or covering) `at`.
    pub fn span_area(&self, at: CellCoord) -> GridArea {
        let anchor_at = self.anchor_coord(at);
        let anchor = self.anchor(anchor_at);
        GridArea::new(
            anchor_at,
            CellCoord::new(
                anchor_at.row + anchor.row_span() - 1,
                anchor_at.col + anchor.col_span() - 1,
            ),
        )
    }

    /// All anchors in row-major order.
    pub fn anchors(&self) -> impl Iterator<Item = (CellCoord, &AnchorCell)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| match cell {
            Cell::Anchor(anchor) => Some((self.coord_of(idx), anchor)),
            Cell::Placeholder { .. } => None,
        })
    }

    /// The cells of `area` in the requested traversal order.
    pub fn cells_in(
        &self,
        area: GridArea,
        order: TraversalOrder,
    ) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        area.coords(order).map(move |at| (at, self.cell(at)))
    }

    fn anchor_raw_mut(&mut self, at: CellCoord) -> &mut AnchorCell {
        let idx = self.idx(at);
        match &mut self.cells[idx] {
            Cell::Anchor(anchor) => anchor,
            Cell::Placeholder { .. } => panic!("expected anchor at {at}"),
        }
    }

    /// Resize the anchor at `at` to `row_span x col_span`, restoring every
    /// invariant before returning.
    ///
    /// Growing converts covered plain 1x1 anchors into placeholders; their
    /// content is discarded, so callers that care collect it first. Fails
    /// with [`GridError::SpanCollision`] if the new rectangle would bisect
    /// another anchor's span. Shrinking re-materializes every uncovered
    /// coordinate as a fresh empty 1x1 anchor.
    pub fn set_span(
        &mut self,
        at: CellCoord,
        row_span: usize,
        col_span: usize,
    ) -> Result<(), GridError> {
        if !self.contains(at) {
            return Err(GridError::OutOfBounds { at });
        }
        if row_span == 0 || col_span == 0 {
            return Err(GridError::ZeroSpan);
        }
        let Cell::Anchor(anchor) = self.cell(at) else {
            return Err(GridError::NotAnAnchor { at });
        };
        let (old_rs, old_cs) = (anchor.row_span(), anchor.col_span());
        if at.row + row_span > self.rows || at.col + col_span > self.cols {
            return Err(GridError::OutOfBounds {
                at: CellCoord::new(at.row + row_span - 1, at.col + col_span - 1),
            });
        }

        // Validate the new rectangle before touching anything.
        for row in at.row..at.row + row_span {
            for col in at.col..at.col + col_span {
                let coord = CellCoord::new(row, col);
                if coord == at {
                    continue;
                }
                match self.cell(coord) {
                    Cell::Anchor(covered) if !covered.is_multi() => {}
                    Cell::Anchor(_) => return Err(GridError::SpanCollision { at: coord }),
                    Cell::Placeholder { parent } if *parent == at => {}
                    Cell::Placeholder { .. } => {
                        return Err(GridError::SpanCollision { at: coord })
                    }
                }
            }
        }

        // Coordinates of the old rectangle that fall outside the new one
        // become fresh independent cells again.
        for row in at.row..at.row + old_rs {
            for col in at.col..at.col + old_cs {
                let coord = CellCoord::new(row, col);
                if coord == at || (row < at.row + row_span && col < at.col + col_span) {
                    continue;
                }
                let idx = self.idx(coord);
                self.cells[idx] = Cell::Anchor(AnchorCell::new());
            }
        }
        // Everything inside the new rectangle (other than the anchor) is a
        // placeholder pointing straight at it.
        for row in at.row..at.row + row_span {
            for col in at.col..at.col + col_span {
                let coord = CellCoord::new(row, col);
                if coord == at {
                    continue;
                }
                let idx = self.idx(coord);
                self.cells[idx] = Cell::placeholder(at);
            }
        }
        self.anchor_raw_mut(at).set_spans(row_span, col_span);

        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(())
    }

    /// Replace the placeholder at `at` with a fresh empty anchor.
    ///
    /// In the dense model this dissolves the covering anchor's whole span
    /// into unit cells (split is built from it); the covering anchor keeps
    /// its content. Fails on an anchor coordinate.
    pub fn materialize_cell(&mut self, at: CellCoord) -> Result<(), GridError> {
        if !self.contains(at) {
            return Err(GridError::OutOfBounds { at });
        }
        match self.cell(at) {
            Cell::Placeholder { parent } => {
                let parent = *parent;
                self.set_span(parent, 1, 1)
            }
            Cell::Anchor(_) => Err(GridError::NotAPlaceholder { at }),
        }
    }

    /// Insert `count` rows adjacent to `index`: before it when `above` is
    /// set, after it otherwise.
    ///
    /// An anchor whose vertical span is crossed strictly inside by the
    /// insertion line grows by `count` — the new rows become part of the
    /// same merged cell. Every other column extent of the boundary row
    /// contributes `count` fresh independent 1-row cells copying the
    /// boundary cell's column span (never its content).
    pub fn insert_rows(
        &mut self,
        index: usize,
        count: usize,
        above: bool,
    ) -> Result<RowInsertion, GridError> {
        if count == 0 {
            return Err(GridError::EmptyRange);
        }
        if index >= self.rows {
            return Err(GridError::OutOfBounds {
                at: CellCoord::new(index, 0),
            });
        }
        // First row of the inserted range.
        let start = if above { index } else { index + 1 };

        // Walk the boundary row one anchor extent at a time.
        let mut extended = Vec::new();
        let mut runs: Vec<(usize, usize, Option<CellCoord>)> = Vec::new();
        let mut col = 0;
        while col < self.cols {
            let anchor_at = self.anchor_coord(CellCoord::new(index, col));
            let anchor = self.anchor(anchor_at);
            debug_assert_eq!(anchor_at.col, col);
            let (row_span, col_span) = (anchor.row_span(), anchor.col_span());
            let crossed = anchor_at.row < start && anchor_at.row + row_span > start;
            if crossed {
                extended.push(anchor_at);
            }
            runs.push((col, col_span, crossed.then_some(anchor_at)));
            col += col_span;
        }

        // Placeholder parents at or past the insertion line shift down.
        for cell in &mut self.cells[start * self.cols..] {
            if let Cell::Placeholder { parent } = cell {
                if parent.row >= start {
                    parent.row += count;
                }
            }
        }

        let mut created = Vec::new();
        let mut inserted = Vec::with_capacity(count * self.cols);
        for offset in 0..count {
            let new_row = start + offset;
            for &(col0, col_span, crossed) in &runs {
                match crossed {
                    Some(anchor_at) => {
                        // Crossed anchors sit above the line; their
                        // coordinate is stable.
                        for _ in 0..col_span {
                            inserted.push(Cell::placeholder(anchor_at));
                        }
                    }
                    None => {
                        inserted.push(Cell::Anchor(AnchorCell::unit_row(col_span)));
                        created.push(CellCoord::new(new_row, col0));
                        for _ in 1..col_span {
                            inserted.push(Cell::placeholder(CellCoord::new(new_row, col0)));
                        }
                    }
                }
            }
        }

        for &anchor_at in &extended {
            let cell = self.anchor_raw_mut(anchor_at);
            let (row_span, col_span) = (cell.row_span(), cell.col_span());
            cell.set_spans(row_span + count, col_span);
        }

        let splice_at = start * self.cols;
        self.cells.splice(splice_at..splice_at, inserted);
        self.rows += count;

        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(RowInsertion {
            index: start,
            count,
            extended,
            created,
        })
    }

    /// Remove rows `[first, last]` (inclusive).
    ///
    /// Anchors straddling the top of the band shrink; anchors starting
    /// inside the band but extending past it survive as a replacement
    /// anchor on the first surviving row with their content moved over
    /// (deleting the *top* of a merged cell must not destroy the remaining
    /// rows' data). Refuses to remove every row.
    pub fn remove_rows(&mut self, first: usize, last: usize) -> Result<RowRemoval, GridError> {
        if first > last {
            return Err(GridError::EmptyRange);
        }
        if last >= self.rows {
            return Err(GridError::OutOfBounds {
                at: CellCoord::new(last, 0),
            });
        }
        let count = last - first + 1;
        if count == self.rows {
            return Err(GridError::WouldEmptyGrid);
        }

        // Classify every anchor intersecting the removed band.
        let mut shrink: Vec<(CellCoord, usize)> = Vec::new();
        let mut tails: Vec<(CellCoord, usize, usize)> = Vec::new();
        for (at, anchor) in self.anchors() {
            let (row_span, col_span) = (anchor.row_span(), anchor.col_span());
            let span_end = at.row + row_span - 1;
            if at.row < first && span_end >= first {
                let cut = count.min(at.row + row_span - first);
                shrink.push((at, row_span - cut));
            } else if at.row >= first && at.row <= last && span_end > last {
                tails.push((at, span_end - last, col_span));
            }
        }

        let mut resized = Vec::new();
        for &(at, new_row_span) in &shrink {
            let col_span = self.anchor(at).col_span();
            self.anchor_raw_mut(at).set_spans(new_row_span, col_span);
            resized.push(at);
        }

        // Take the dying anchors' content before their rows disappear.
        let mut relocated = Vec::new();
        let mut replacements: Vec<(CellCoord, AnchorCell)> = Vec::new();
        for &(at, tail_rows, col_span) in &tails {
            let anchor = self.anchor_raw_mut(at);
            let mut replacement = AnchorCell::new();
            replacement.content = std::mem::take(&mut anchor.content);
            replacement.style = anchor.style.take();
            replacement.set_spans(tail_rows, col_span);
            let new_at = CellCoord::new(first, at.col);
            replacements.push((new_at, replacement));
            relocated.push((at, new_at));
        }

        // Remap surviving placeholders: parents below the band shift up,
        // parents inside the band re-point at the replacement tail anchor.
        for cell in &mut self.cells[(last + 1) * self.cols..] {
            if let Cell::Placeholder { parent } = cell {
                if parent.row > last {
                    parent.row -= count;
                } else if parent.row >= first {
                    *parent = CellCoord::new(first, parent.col);
                }
            }
        }

        self.cells.drain(first * self.cols..(last + 1) * self.cols);
        self.rows -= count;

        for (at, replacement) in replacements {
            let idx = self.idx(at);
            self.cells[idx] = Cell::Anchor(replacement);
        }

        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(RowRemoval {
            index: first,
            count,
            resized,
            relocated,
        })
    }

    /// Insert `count` columns adjacent to `index`; the exact transpose of
    /// [`Grid::insert_rows`] (`before` picks the left side).
    pub fn insert_cols(
        &mut self,
        index: usize,
        count: usize,
        before: bool,
    ) -> Result<ColInsertion, GridError> {
        let mut transposed = self.transposed();
        let report = transposed.insert_rows(index, count, before)?;
        *self = transposed.transposed();
        Ok(ColInsertion {
            index: report.index,
            count: report.count,
            extended: report.extended.iter().map(|at| at.transposed()).collect(),
            created: report.created.iter().map(|at| at.transposed()).collect(),
        })
    }

    /// Remove columns `[first, last]`; the exact transpose of
    /// [`Grid::remove_rows`].
    pub fn remove_cols(&mut self, first: usize, last: usize) -> Result<ColRemoval, GridError> {
        let mut transposed = self.transposed();
        let report = transposed.remove_rows(first, last)?;
        *self = transposed.transposed();
        Ok(ColRemoval {
            index: report.index,
            count: report.count,
            resized: report.resized.iter().map(|at| at.transposed()).collect(),
            relocated: report
                .relocated
                .iter()
                .map(|(old, new)| (old.transposed(), new.transposed()))
                .collect(),
        })
    }

    /// Clone the rectangle as a standalone grid.
    ///
    /// Spans are clamped at the rectangle edge; coordinates covered by an
    /// anchor outside the rectangle come out as fresh empty cells. Used by
    /// copy.
    pub fn extract(&self, area: GridArea) -> Result<Grid, GridError> {
        if !self.contains(area.end) {
            return Err(GridError::OutOfBounds { at: area.end });
        }
        let mut cells = Vec::with_capacity(area.row_count() * area.col_count());
        for at in area.coords(TraversalOrder::Forward) {
            cells.push(match self.cell(at) {
                Cell::Anchor(anchor) => {
                    let row_span = anchor.row_span().min(area.end.row - at.row + 1);
                    let col_span = anchor.col_span().min(area.end.col - at.col + 1);
                    Cell::Anchor(anchor.with_spans(row_span, col_span))
                }
                Cell::Placeholder { parent } if area.contains(*parent) => Cell::placeholder(
                    CellCoord::new(parent.row - area.begin.row, parent.col - area.begin.col),
                ),
                // Covered by an anchor outside the rectangle.
                Cell::Placeholder { .. } => Cell::Anchor(AnchorCell::new()),
            });
        }
        let grid = Grid {
            rows: area.row_count(),
            cols: area.col_count(),
            cells,
        };
        debug_assert_eq!(grid.check_invariants(), Ok(()));
        Ok(grid)
    }

    fn transposed(&self) -> Grid {
        let mut cells = Vec::with_capacity(self.cells.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                cells.push(match &self.cells[row * self.cols + col] {
                    Cell::Anchor(anchor) => Cell::Anchor(anchor.transposed()),
                    Cell::Placeholder { parent } => Cell::placeholder(parent.transposed()),
                });
            }
        }
        Grid {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Verify the four structural invariants:
    /// 1. every coordinate maps to exactly one cell;
    /// 2. an anchor's declared span exactly covers contiguous placeholders
    ///    pointing back at it;
    /// 3. placeholders carry no content (unrepresentable by construction,
    ///    checked via coverage);
    /// 4. spans are at least 1.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.rows == 0 || self.cols == 0 {
            return Err(InvariantViolation::ZeroDimension);
        }
        if self.cells.len() != self.rows * self.cols {
            return Err(InvariantViolation::CellCountMismatch {
                expected: self.rows * self.cols,
                found: self.cells.len(),
            });
        }

        let mut owner: Vec<Option<CellCoord>> = vec![None; self.cells.len()];
        for (idx, cell) in self.cells.iter().enumerate() {
            let at = self.coord_of(idx);
            if let Cell::Anchor(anchor) = cell {
                if anchor.row_span() == 0 || anchor.col_span() == 0 {
                    return Err(InvariantViolation::ZeroSpan { at });
                }
                if at.row + anchor.row_span() > self.rows || at.col + anchor.col_span() > self.cols
                {
                    return Err(InvariantViolation::SpanOutOfBounds { at });
                }
                for row in at.row..at.row + anchor.row_span() {
                    for col in at.col..at.col + anchor.col_span() {
                        let covered = row * self.cols + col;
                        if owner[covered].is_some() {
                            return Err(InvariantViolation::SpanOverlap {
                                at: CellCoord::new(row, col),
                            });
                        }
                        owner[covered] = Some(at);
                    }
                }
            }
        }
        for (idx, cell) in self.cells.iter().enumerate() {
            let at = self.coord_of(idx);
            match cell {
                Cell::Anchor(_) => {
                    if owner[idx] != Some(at) {
                        return Err(InvariantViolation::SpanOverlap { at });
                    }
                }
                Cell::Placeholder { parent } => {
                    if owner[idx] != Some(*parent) {
                        return Err(InvariantViolation::BadPlaceholder {
                            at,
                            parent: *parent,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
