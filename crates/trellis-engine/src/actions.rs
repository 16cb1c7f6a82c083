use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use trellis_model::GridArea;

use crate::clipboard::ClipboardPayload;

/// A completed mutating command with its replayable arguments.
///
/// Serialized as-is onto the host's history/collaboration transport; the
/// variants therefore carry everything needed to re-run the command against
/// a replica of the pre-command grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TableAction {
    InsertRows {
        index: usize,
        count: usize,
        above: bool,
    },
    InsertCols {
        index: usize,
        count: usize,
        before: bool,
    },
    RemoveRows {
        index: usize,
        count: usize,
    },
    RemoveCols {
        index: usize,
        count: usize,
    },
    MergeCells {
        area: GridArea,
    },
    SplitCells {
        area: GridArea,
    },
    Paste {
        payload: ClipboardPayload,
        split_destination: bool,
    },
    Clear {
        area: GridArea,
    },
    ClearFormat {
        area: GridArea,
    },
}

/// Notifications the engine hands to its host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TableEvent {
    /// Fired exactly once after every successful mutating command.
    Actioned(TableAction),
    /// Fired instead of performing removal when the engine operates in
    /// view-only mode; the host handles removal externally.
    TableRemoved,
}

/// Host-registered event listener. The engine is single-threaded by design,
/// so callbacks are plain `FnMut` without `Send` bounds.
pub type EventCallback = Box<dyn FnMut(&TableEvent)>;

/// Cloneable recording listener for hosts and tests.
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Rc<RefCell<Vec<TableEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends every event to this collector.
    pub fn callback(&self) -> EventCallback {
        let events = Rc::clone(&self.events);
        Box::new(move |event| events.borrow_mut().push(event.clone()))
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<TableEvent> {
        self.events.borrow().clone()
    }

    /// Snapshot of the recorded `Actioned` payloads only.
    pub fn actions(&self) -> Vec<TableAction> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                TableEvent::Actioned(action) => Some(action.clone()),
                TableEvent::TableRemoved => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
