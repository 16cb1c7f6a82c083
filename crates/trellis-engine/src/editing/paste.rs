use serde::{Deserialize, Serialize};
use trellis_model::{Cell, CellCoord, Grid, GridArea, TraversalOrder};

use crate::actions::TableAction;
use crate::clipboard::ClipboardPayload;
use crate::engine::TableEngine;
use crate::render::RenderIntent;

/// Knobs for [`TableEngine::paste_with_options`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteOptions {
    /// Split merged cells in the destination rectangle before tiling.
    /// Suppressed when replaying a paste whose destination was prepared by
    /// an earlier recorded command.
    pub split_destination: bool,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self {
            split_destination: true,
        }
    }
}

impl TableEngine {
    /// Paste with default options.
    pub fn paste(&mut self, payload: ClipboardPayload) -> bool {
        self.paste_with_options(payload, PasteOptions::default())
    }

    /// Paste `payload` onto the current selection.
    ///
    /// Tabular payloads tile across the destination rectangle with modulo
    /// addressing; source merges are clamped so they never write past the
    /// rectangle's edge. A single-cell destination grows the grid at its
    /// trailing edges instead and receives the source exactly once.
    pub fn paste_with_options(&mut self, payload: ClipboardPayload, options: PasteOptions) -> bool {
        if self.grid.is_none() || self.selection.is_none() {
            return false;
        }
        match payload {
            ClipboardPayload::Grid(source) => self.paste_grid(source, options),
            ClipboardPayload::Fragment(fragment) => self.paste_fragment(fragment, options),
        }
    }

    /// Copy the selected rectangle to the clipboard provider. Mutates
    /// nothing and emits no action.
    pub fn copy(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let Ok(extracted) = grid.extract(sel.area()) else {
            return false;
        };
        let Some(clipboard) = self.clipboard.as_mut() else {
            return false;
        };
        clipboard.write(&ClipboardPayload::Grid(extracted));
        true
    }

    /// Copy, then clear the selection's content.
    pub fn cut(&mut self) -> bool {
        self.copy();
        self.clear()
    }

    /// Read the clipboard provider and paste its payload.
    pub fn paste_from_clipboard(&mut self) -> bool {
        let Some(payload) = self.clipboard.as_ref().and_then(|provider| provider.read()) else {
            return false;
        };
        self.paste(payload)
    }

    fn paste_grid(&mut self, source: Grid, options: PasteOptions) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };

        // A single-coordinate selection on a merged cell is that cell's
        // whole rectangle, not a cursor.
        let mut area = sel.area();
        if area.is_single_cell() {
            area = grid.span_area(area.begin);
        }

        // Shortcut: the source is one real cell and the destination one
        // plain cell — copy content, no geometry change.
        let origin = CellCoord::new(0, 0);
        let source_is_single =
            source.anchor(origin).row_span() == source.rows()
                && source.anchor(origin).col_span() == source.cols();
        if source_is_single && area.is_single_cell() {
            let at = area.begin;
            let Some(grid) = self.grid.as_mut() else {
                return false;
            };
            let src = source.anchor(origin);
            let dest = grid.anchor_mut(at);
            dest.content = src.content.clone();
            dest.style = src.style.clone();
            self.render.apply(RenderIntent::SetContent {
                at,
                content: src.content.clone(),
            });
            self.render.apply(RenderIntent::SetStyle {
                at,
                style: src.style.clone(),
            });
            self.complete(TableAction::Paste {
                payload: ClipboardPayload::Grid(source),
                split_destination: options.split_destination,
            });
            return true;
        }

        // Auto-grow: a single-cell destination receives the source exactly
        // once, growing the grid at its trailing edges until it fits. The
        // growth is internal plumbing and emits no action of its own.
        if area.is_single_cell() {
            let begin = area.begin;
            if !self.grow_to_fit(begin, source.rows(), source.cols()) {
                return false;
            }
            area = GridArea::new(
                begin,
                CellCoord::new(begin.row + source.rows() - 1, begin.col + source.cols() - 1),
            );
        }

        if options.split_destination {
            self.split_area(area);
        }

        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let begin = area.begin;
        for at in area.coords(TraversalOrder::Forward) {
            // Fresh lookup, not a stale snapshot: coordinates swallowed by
            // an earlier clamped span (the source's holes) are skipped.
            if grid.cell(at).is_placeholder() {
                continue;
            }
            let src_at = CellCoord::new(
                (at.row - begin.row) % source.rows(),
                (at.col - begin.col) % source.cols(),
            );
            match source.cell(src_at) {
                Cell::Anchor(src) if src.is_multi() => {
                    // A source merge is never allowed to write past the
                    // destination rectangle's edge.
                    let row_span = src.row_span().min(area.end.row - at.row + 1);
                    let col_span = src.col_span().min(area.end.col - at.col + 1);
                    match grid.set_span(at, row_span, col_span) {
                        Ok(()) => self.render.apply(RenderIntent::SetSpan {
                            at,
                            row_span,
                            col_span,
                        }),
                        Err(err) => {
                            // Unsplit destination merge in the way; copy
                            // content only.
                            log::debug!("paste span at {at} not applied: {err}");
                        }
                    }
                    let dest = grid.anchor_mut(at);
                    dest.content = src.content.clone();
                    dest.style = src.style.clone();
                    self.render.apply(RenderIntent::SetContent {
                        at,
                        content: src.content.clone(),
                    });
                    self.render.apply(RenderIntent::SetStyle {
                        at,
                        style: src.style.clone(),
                    });
                }
                Cell::Anchor(src) => {
                    let dest = grid.anchor_mut(at);
                    dest.content = src.content.clone();
                    dest.style = src.style.clone();
                    self.render.apply(RenderIntent::SetContent {
                        at,
                        content: src.content.clone(),
                    });
                    self.render.apply(RenderIntent::SetStyle {
                        at,
                        style: src.style.clone(),
                    });
                }
                Cell::Placeholder { .. } => {
                    // The destination inherits the source's holes. When the
                    // projected parent's clamped span covers this
                    // coordinate the cell already reads as a placeholder
                    // and was skipped above; here clamping cut the parent
                    // short, so the cell survives and is blanked.
                    let dest = grid.anchor_mut(at);
                    dest.content.clear();
                    dest.style = None;
                    self.render.apply(RenderIntent::SetContent {
                        at,
                        content: String::new(),
                    });
                }
            }
        }

        self.reselect_area(area);
        self.complete(TableAction::Paste {
            payload: ClipboardPayload::Grid(source),
            split_destination: options.split_destination,
        });
        true
    }

    /// Grow the grid at its trailing edges until `begin + (rows, cols)`
    /// fits. Internal growth: render intents fire, no action event does.
    fn grow_to_fit(&mut self, begin: CellCoord, rows: usize, cols: usize) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        if begin.col + cols > grid.cols() {
            let count = begin.col + cols - grid.cols();
            let report = match grid.insert_cols(grid.cols() - 1, count, false) {
                Ok(report) => report,
                Err(err) => {
                    log::debug!("paste column growth rejected: {err}");
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
        }
        if begin.row + rows > grid.rows() {
            let count = begin.row + rows - grid.rows();
            let report = match grid.insert_rows(grid.rows() - 1, count, false) {
                Ok(report) => report,
                Err(err) => {
                    log::debug!("paste row growth rejected: {err}");
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
        }
        true
    }

    /// Non-tabular payloads merge the destination into one cell and append
    /// the fragment to its content. Deliberately not a rich paste
    /// implementation.
    fn paste_fragment(&mut self, fragment: String, options: PasteOptions) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let area = sel.area();
        log::debug!("non-tabular paste payload; merging destination and inserting fragment");
        if !area.is_single_cell() && !self.merge_area(area) {
            return false;
        }
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let at = grid.anchor_coord(area.begin);
        let anchor = grid.anchor_mut(at);
        anchor.content.push_str(&fragment);
        let content = anchor.content.clone();
        self.render.apply(RenderIntent::SetContent { at, content });
        self.complete(TableAction::Paste {
            payload: ClipboardPayload::Fragment(fragment),
            split_destination: options.split_destination,
        });
        true
    }
}
