use serde::{Deserialize, Serialize};
use trellis_model::Grid;

/// What a paste operation receives from the clipboard collaborator.
///
/// The HTML-to-model parsing itself belongs to the host editor; by the time
/// a payload reaches the engine it is either a well-formed [`Grid`] or an
/// opaque markup fragment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClipboardPayload {
    /// A parsed source grid (tabular paste).
    Grid(Grid),
    /// Non-tabular content; pasted into a single merged destination cell.
    Fragment(String),
}

/// OS clipboard access, abstracted so the engine never touches platform
/// APIs (or waits on clipboard permission prompts).
pub trait ClipboardProvider {
    fn read(&self) -> Option<ClipboardPayload>;
    fn write(&mut self, payload: &ClipboardPayload);
}

/// Process-local provider for tests and headless hosts.
///
/// Clones share the same slot, so a host can keep a handle to the payload
/// after moving a clone into the engine.
#[derive(Clone, Debug, Default)]
pub struct InMemoryClipboard {
    payload: std::rc::Rc<std::cell::RefCell<Option<ClipboardPayload>>>,
}

impl InMemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: ClipboardPayload) -> Self {
        let clipboard = Self::new();
        *clipboard.payload.borrow_mut() = Some(payload);
        clipboard
    }

    pub fn payload(&self) -> Option<ClipboardPayload> {
        self.payload.borrow().clone()
    }
}

impl ClipboardProvider for InMemoryClipboard {
    fn read(&self) -> Option<ClipboardPayload> {
        self.payload.borrow().clone()
    }

    fn write(&mut self, payload: &ClipboardPayload) {
        *self.payload.borrow_mut() = Some(payload.clone());
    }
}
