use trellis_model::Axis;

use crate::actions::TableAction;
use crate::engine::{InsertPosition, TableEngine};
use crate::render::RenderIntent;

impl TableEngine {
    /// Insert `count` rows adjacent to `index` (`above` picks the side).
    ///
    /// Anchors whose vertical span is crossed strictly inside by the
    /// insertion line grow instead of being duplicated; afterwards, when a
    /// selection exists, the inserted rows are re-selected as whole rows —
    /// selection state is recomputed, never assumed.
    pub fn insert_rows_at(&mut self, index: usize, count: usize, above: bool) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let report = match grid.insert_rows(index, count, above) {
            Ok(report) => report,
            Err(err) => {
                log::debug!("row insertion rejected: {err}");
                return false;
            }
        };
        self.render.apply(RenderIntent::InsertRows {
            index: report.index,
            count: report.count,
        });
        for &at in &report.created {
            self.render.apply(RenderIntent::CreateCell { at });
        }
        for &at in &report.extended {
            let anchor = grid.anchor(at);
            self.render.apply(RenderIntent::SetSpan {
                at,
                row_span: anchor.row_span(),
                col_span: anchor.col_span(),
            });
        }
        self.reselect_rows(report.index, report.index + count - 1);
        self.complete(TableAction::InsertRows {
            index,
            count,
            above,
        });
        true
    }

    /// Insert `count` rows relative to the current selection (or at the end
    /// of the table).
    pub fn insert_rows(&mut self, position: InsertPosition, count: usize) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let (index, above) = match position {
            InsertPosition::End => (grid.rows() - 1, false),
            InsertPosition::Before => {
                let Some(sel) = self.selection else {
                    return false;
                };
                (sel.area().begin.row, true)
            }
            InsertPosition::After => {
                let Some(sel) = self.selection else {
                    return false;
                };
                // "After" means after the selection's true extent, so a
                // merged cell straddling the selection edge is not split
                // off from its tail.
                let expanded = sel.expanded_to_spans(grid, Axis::Rows);
                (expanded.area().end.row, false)
            }
        };
        self.insert_rows_at(index, count, above)
    }

    pub fn insert_row_above(&mut self) -> bool {
        self.insert_rows(InsertPosition::Before, 1)
    }

    pub fn insert_row_below(&mut self) -> bool {
        self.insert_rows(InsertPosition::After, 1)
    }

    /// Remove the selected rows.
    ///
    /// The selection is first expanded to the true vertical extent of every
    /// merged cell it touches. If the expanded range covers every row the
    /// command delegates to [`TableEngine::remove_table`] — a zero-row grid
    /// must never exist.
    pub fn remove_rows(&mut self) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let Some(sel) = self.selection else {
            return false;
        };
        let expanded = sel.expanded_to_spans(grid, Axis::Rows);
        if expanded.all_rows() {
            return self.remove_table();
        }
        let (first, last) = (expanded.area().begin.row, expanded.area().end.row);

        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let report = match grid.remove_rows(first, last) {
            Ok(report) => report,
            Err(err) => {
                log::debug!("row removal rejected: {err}");
                return false;
            }
        };
        for &at in &report.resized {
            let anchor = grid.anchor(at);
            self.render.apply(RenderIntent::SetSpan {
                at,
                row_span: anchor.row_span(),
                col_span: anchor.col_span(),
            });
        }
        // Physical rows disappear in descending index order so earlier
        // indices stay valid for the adapter.
        for index in (first..=last).rev() {
            self.render.apply(RenderIntent::RemoveRow { index });
        }
        // Surviving tails of merged cells whose top was cut off.
        for &(_, at) in &report.relocated {
            let anchor = grid.anchor(at);
            self.render.apply(RenderIntent::CreateCell { at });
            self.render.apply(RenderIntent::SetSpan {
                at,
                row_span: anchor.row_span(),
                col_span: anchor.col_span(),
            });
            self.render.apply(RenderIntent::SetContent {
                at,
                content: anchor.content.clone(),
            });
        }
        self.selection = None;
        self.complete(TableAction::RemoveRows {
            index: first,
            count: report.count,
        });
        true
    }

    /// Insert `count` columns adjacent to `index`; the exact transpose of
    /// [`TableEngine::insert_rows_at`].
    pub fn insert_cols_at(&mut self, index: usize, count: usize, before: bool) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let report = match grid.insert_cols(index, count, before) {
            Ok(report) => report,
            Err(err) => {
                log::debug!("column insertion rejected: {err}");
                return false;
            }
        };
        self.render.apply(RenderIntent::InsertCols {
            index: report.index,
            count: report.count,
        });
        for &at in &report.created {
            self.render.apply(RenderIntent::CreateCell { at });
        }
        for &at in &report.extended {
            let anchor = grid.anchor(at);
            self.render.apply(RenderIntent::SetSpan {
                at,
                row_span: anchor.row_span(),
                col_span: anchor.col_span(),
            });
        }
        self.reselect_cols(report.index, report.index + count - 1);
        self.complete(TableAction::InsertCols {
            index,
            count,
            before,
        });
        true
    }

    /// Insert `count` columns relative to the current selection (or at the
    /// end of the table).
    pub fn insert_cols(&mut self, position: InsertPosition, count: usize) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let (index, before) = match position {
            InsertPosition::End => (grid.cols() - 1, false),
            InsertPosition::Before => {
                let Some(sel) = self.selection else {
                    return false;
                };
                (sel.area().begin.col, true)
            }
            InsertPosition::After => {
                let Some(sel) = self.selection else {
                    return false;
                };
                let expanded = sel.expanded_to_spans(grid, Axis::Cols);
                (expanded.area().end.col, false)
            }
        };
        self.insert_cols_at(index, count, before)
    }

    pub fn insert_col_left(&mut self) -> bool {
        self.insert_cols(InsertPosition::Before, 1)
    }

    pub fn insert_col_right(&mut self) -> bool {
        self.insert_cols(InsertPosition::After, 1)
    }

    /// Remove the selected columns; the exact transpose of
    /// [`TableEngine::remove_rows`], with the whole-table delegation
    /// triggering when the expanded selection covers every column.
    pub fn remove_cols(&mut self) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let Some(sel) = self.selection else {
            return false;
        };
        let expanded = sel.expanded_to_spans(grid, Axis::Cols);
        if expanded.all_cols() {
            return self.remove_table();
        }
        let (first, last) = (expanded.area().begin.col, expanded.area().end.col);

        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let report = match grid.remove_cols(first, last) {
            Ok(report) => report,
            Err(err) => {
                log::debug!("column removal rejected: {err}");
                return false;
            }
        };
        for &at in &report.resized {
            let anchor = grid.anchor(at);
            self.render.apply(RenderIntent::SetSpan {
                at,
                row_span: anchor.row_span(),
                col_span: anchor.col_span(),
            });
        }
        for index in (first..=last).rev() {
            self.render.apply(RenderIntent::RemoveCol { index });
        }
        for &(_, at) in &report.relocated {
            let anchor = grid.anchor(at);
            self.render.apply(RenderIntent::CreateCell { at });
            self.render.apply(RenderIntent::SetSpan {
                at,
                row_span: anchor.row_span(),
                col_span: anchor.col_span(),
            });
            self.render.apply(RenderIntent::SetContent {
                at,
                content: anchor.content.clone(),
            });
        }
        self.selection = None;
        self.complete(TableAction::RemoveCols {
            index: first,
            count: report.count,
        });
        true
    }
}
