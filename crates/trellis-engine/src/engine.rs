use trellis_model::{Cell, CellCoord, Grid, GridArea, Selection, TraversalOrder};

use crate::actions::{EventCallback, TableAction, TableEvent};
use crate::clipboard::ClipboardProvider;
use crate::render::{NoopRender, RenderIntent, RenderSink};

/// Where a selection-relative insertion lands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the selection (above / to the left).
    Before,
    /// After the selection's true span extent (below / to the right).
    After,
    /// At the trailing edge of the table.
    End,
}

/// The delete-key state machine.
///
/// The first `clear()` against a whole-row/whole-column/whole-table
/// selection only blanks content and arms the matching latch; a second
/// consecutive `clear()` of the same kind fires the destructive action. A
/// single enum field makes overlapping armed states unrepresentable, and
/// any other successful command disarms it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ClearLatch {
    #[default]
    Idle,
    RowsArmed,
    ColsArmed,
    TableArmed,
}

/// The structural edit-command engine for one table.
///
/// Owns the logical [`Grid`] for the table's lifetime. Commands return
/// `true` iff they mutated the grid and emitted their action event;
/// precondition failures (no grid, no selection) are silent no-ops.
///
/// Single-threaded and non-reentrant by design: the surrounding editor
/// serializes command invocation, e.g. by running all edits on one event
/// dispatch thread.
pub struct TableEngine {
    pub(crate) grid: Option<Grid>,
    pub(crate) selection: Option<Selection>,
    pub(crate) latch: ClearLatch,
    view_only: bool,
    pub(crate) render: Box<dyn RenderSink>,
    pub(crate) clipboard: Option<Box<dyn ClipboardProvider>>,
    callbacks: Vec<EventCallback>,
}

impl TableEngine {
    /// An interactive engine over `grid`, rendering to nothing.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid: Some(grid),
            selection: None,
            latch: ClearLatch::Idle,
            view_only: false,
            render: Box::new(NoopRender),
            clipboard: None,
            callbacks: Vec::new(),
        }
    }

    /// A view-only engine: destructive table removal is delegated to the
    /// host via [`TableEvent::TableRemoved`] instead of being performed.
    pub fn view_only(grid: Grid) -> Self {
        Self {
            view_only: true,
            ..Self::new(grid)
        }
    }

    pub fn set_render_sink(&mut self, sink: Box<dyn RenderSink>) {
        self.render = sink;
    }

    pub fn set_clipboard(&mut self, provider: Box<dyn ClipboardProvider>) {
        self.clipboard = Some(provider);
    }

    /// Register an event listener; every listener sees every event.
    pub fn on_event(&mut self, callback: EventCallback) {
        self.callbacks.push(callback);
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// `true` once the table has been removed; every command is a no-op
    /// from then on.
    pub fn is_removed(&self) -> bool {
        self.grid.is_none()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn clear_latch(&self) -> ClearLatch {
        self.latch
    }

    /// Resolve and store the selection rectangle spanned by two corners.
    pub fn select(&mut self, a: CellCoord, b: CellCoord) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        self.selection = Some(Selection::resolve(grid, a, b));
        true
    }

    pub fn select_cell(&mut self, at: CellCoord) -> bool {
        self.select(at, at)
    }

    /// Select rows `[first, last]` as whole rows.
    pub fn select_rows(&mut self, first: usize, last: usize) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let cols = grid.cols();
        self.select(CellCoord::new(first, 0), CellCoord::new(last, cols - 1))
    }

    /// Select columns `[first, last]` as whole columns.
    pub fn select_cols(&mut self, first: usize, last: usize) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let rows = grid.rows();
        self.select(CellCoord::new(0, first), CellCoord::new(rows - 1, last))
    }

    pub fn select_all(&mut self) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            return false;
        };
        let area = grid.full_area();
        self.select(area.begin, area.end)
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Remove the whole table.
    ///
    /// Interactive mode discards the grid; view-only mode leaves it
    /// untouched and notifies the host instead.
    pub fn remove_table(&mut self) -> bool {
        if self.grid.is_none() {
            return false;
        }
        self.latch = ClearLatch::Idle;
        if self.view_only {
            self.emit(&TableEvent::TableRemoved);
            return true;
        }
        self.grid = None;
        self.selection = None;
        true
    }

    /// The delete-key command.
    ///
    /// Blanks the selected cells' content; for whole-row, whole-column, and
    /// whole-table selections a second consecutive call fires the matching
    /// destructive removal instead (see [`ClearLatch`]).
    pub fn clear(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if self.grid.is_none() {
            return false;
        }

        let kind = if sel.all_rows() && sel.all_cols() {
            ClearLatch::TableArmed
        } else if sel.all_cols() {
            // Full width: whole rows are selected.
            ClearLatch::RowsArmed
        } else if sel.all_rows() {
            ClearLatch::ColsArmed
        } else {
            ClearLatch::Idle
        };

        if kind != ClearLatch::Idle && self.latch == kind {
            self.latch = ClearLatch::Idle;
            return match kind {
                ClearLatch::TableArmed => self.remove_table(),
                ClearLatch::RowsArmed => self.remove_rows(),
                ClearLatch::ColsArmed => self.remove_cols(),
                ClearLatch::Idle => unreachable!(),
            };
        }

        let area = sel.area();
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        for at in area.coords(TraversalOrder::Forward) {
            if let Cell::Anchor(_) = grid.cell(at) {
                grid.anchor_mut(at).content.clear();
                self.render.apply(RenderIntent::SetContent {
                    at,
                    content: String::new(),
                });
            }
        }
        self.emit(&TableEvent::Actioned(TableAction::Clear { area }));
        self.latch = kind;
        true
    }

    /// Strip the style payload of every selected anchor.
    pub fn clear_format(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let area = sel.area();
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        for at in area.coords(TraversalOrder::Forward) {
            if let Cell::Anchor(_) = grid.cell(at) {
                grid.anchor_mut(at).style = None;
                self.render
                    .apply(RenderIntent::SetStyle { at, style: None });
            }
        }
        self.complete(TableAction::ClearFormat { area });
        true
    }

    /// Finish a successful mutating command: disarm the clear latch and
    /// fire the action event (after the mutation, never before).
    pub(crate) fn complete(&mut self, action: TableAction) {
        self.latch = ClearLatch::Idle;
        self.emit(&TableEvent::Actioned(action));
    }

    pub(crate) fn emit(&mut self, event: &TableEvent) {
        for callback in &mut self.callbacks {
            callback(event);
        }
    }

    /// Whole-row reselection helper used after row insertion.
    pub(crate) fn reselect_rows(&mut self, first: usize, last: usize) {
        if self.selection.is_none() {
            return;
        }
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let cols = grid.cols();
        self.selection = Some(Selection::resolve(
            grid,
            CellCoord::new(first, 0),
            CellCoord::new(last, cols - 1),
        ));
    }

    /// Whole-column reselection helper used after column insertion.
    pub(crate) fn reselect_cols(&mut self, first: usize, last: usize) {
        if self.selection.is_none() {
            return;
        }
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let rows = grid.rows();
        self.selection = Some(Selection::resolve(
            grid,
            CellCoord::new(0, first),
            CellCoord::new(rows - 1, last),
        ));
    }

    pub(crate) fn reselect_area(&mut self, area: GridArea) {
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        self.selection = Some(Selection::from_area(grid, area));
    }
}
