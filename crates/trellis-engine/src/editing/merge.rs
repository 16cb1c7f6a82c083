use trellis_model::{Cell, GridArea, TraversalOrder};

use crate::actions::TableAction;
use crate::engine::TableEngine;
use crate::render::RenderIntent;

impl TableEngine {
    /// Split every merged cell the selection touches back into 1x1 cells.
    pub fn split_cells(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if self.grid.is_none() {
            return false;
        }
        let area = sel.area();
        if !self.split_area(area) {
            return false;
        }
        self.complete(TableAction::SplitCells { area });
        true
    }

    /// Merge the selected rectangle into one spanning cell.
    ///
    /// The top-left cell becomes the anchor; every other cell's non-blank
    /// content survives, prepended to the anchor's content in document
    /// order.
    pub fn merge_cells(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let area = sel.area();
        if !self.merge_area(area) {
            return false;
        }
        self.complete(TableAction::MergeCells { area });
        true
    }

    /// Split pass shared by split, merge, and paste. Emits render intents
    /// but no action event; returns `true` iff anything changed.
    ///
    /// Anchors and their freed coordinates are processed in descending
    /// row-then-column order: an adapter inserting a physical cell for a
    /// freed coordinate then never shifts the index of a not-yet-processed
    /// one.
    pub(crate) fn split_area(&mut self, area: GridArea) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        if !grid.contains(area.end) {
            return false;
        }
        let mut changed = false;
        for at in area.coords(TraversalOrder::Reverse) {
            let is_multi = matches!(grid.cell(at), Cell::Anchor(anchor) if anchor.is_multi());
            if !is_multi {
                continue;
            }
            let span = grid.span_area(at);
            if let Err(err) = grid.set_span(at, 1, 1) {
                log::debug!("split skipped at {at}: {err}");
                continue;
            }
            changed = true;
            self.render.apply(RenderIntent::SetSpan {
                at,
                row_span: 1,
                col_span: 1,
            });
            for freed in span.coords(TraversalOrder::Reverse) {
                if freed != at {
                    self.render.apply(RenderIntent::CreateCell { at: freed });
                }
            }
        }
        changed
    }

    /// Merge pass shared by merge and the non-tabular paste fallback.
    /// Emits render intents but no action event.
    pub(crate) fn merge_area(&mut self, area: GridArea) -> bool {
        if area.is_single_cell() {
            return false;
        }
        {
            let Some(grid) = self.grid.as_ref() else {
                return false;
            };
            if !grid.contains(area.end) {
                return false;
            }
            // Precondition: no cell in the rectangle is covered by an
            // anchor outside it. Splitting cannot fix those, and a partial
            // merge would corrupt the span bookkeeping.
            for at in area.coords(TraversalOrder::Forward) {
                if !area.contains(grid.anchor_coord(at)) {
                    log::debug!("merge rejected: {at} is covered from outside the selection");
                    return false;
                }
            }
        }

        self.split_area(area);

        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let begin = area.begin;
        // Reverse traversal with prepend preserves document order among the
        // absorbed cells.
        let mut absorbed: Vec<String> = Vec::new();
        for at in area.coords(TraversalOrder::Reverse) {
            if at == begin {
                continue;
            }
            if let Cell::Anchor(anchor) = grid.cell(at) {
                if !anchor.is_blank() {
                    absorbed.insert(0, anchor.content.clone());
                }
            }
        }

        if let Err(err) = grid.set_span(begin, area.row_count(), area.col_count()) {
            log::debug!("merge failed at {begin}: {err}");
            return false;
        }
        let anchor = grid.anchor_mut(begin);
        if !absorbed.is_empty() {
            anchor.content = format!("{}{}", absorbed.concat(), anchor.content);
        }
        let content = anchor.content.clone();

        for at in area.coords(TraversalOrder::Reverse) {
            if at != begin {
                self.render.apply(RenderIntent::RemoveCell { at });
            }
        }
        self.render.apply(RenderIntent::SetSpan {
            at: begin,
            row_span: area.row_count(),
            col_span: area.col_count(),
        });
        self.render.apply(RenderIntent::SetContent {
            at: begin,
            content,
        });
        self.reselect_area(area);
        true
    }
}
