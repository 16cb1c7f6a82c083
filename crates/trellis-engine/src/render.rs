use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use trellis_model::CellCoord;

/// A structural intent for the rendering collaborator.
///
/// The engine describes *what* changed in logical coordinates; the adapter
/// owns the mapping to physical rows/elements. Row, column, and cell
/// removal intents are always emitted in descending index order so an
/// adapter applying them one by one never invalidates its own later
/// indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderIntent {
    InsertRows { index: usize, count: usize },
    RemoveRow { index: usize },
    InsertCols { index: usize, count: usize },
    RemoveCol { index: usize },
    CreateCell { at: CellCoord },
    RemoveCell { at: CellCoord },
    SetSpan { at: CellCoord, row_span: usize, col_span: usize },
    SetContent { at: CellCoord, content: String },
    SetStyle { at: CellCoord, style: Option<String> },
}

/// Rendering collaborator interface.
pub trait RenderSink {
    fn apply(&mut self, intent: RenderIntent);
}

/// Discards every intent; the default sink for headless use.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRender;

impl RenderSink for NoopRender {
    fn apply(&mut self, _intent: RenderIntent) {}
}

/// Recording sink; clones share the same log, so a test can keep a handle
/// after moving a clone into the engine.
#[derive(Clone, Default)]
pub struct RenderLog {
    intents: Rc<RefCell<Vec<RenderIntent>>>,
}

impl RenderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> Vec<RenderIntent> {
        self.intents.borrow().clone()
    }

    pub fn clear(&self) {
        self.intents.borrow_mut().clear();
    }
}

impl RenderSink for RenderLog {
    fn apply(&mut self, intent: RenderIntent) {
        self.intents.borrow_mut().push(intent);
    }
}
