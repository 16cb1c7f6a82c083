//! `trellis-engine` implements the structural edit commands over the
//! [`trellis_model`] grid: row/column insertion and removal, merge/split,
//! clipboard tiling, and the delete-key clear state machine.
//!
//! The engine owns a grid for the table's lifetime and mutates it in place;
//! everything else is a collaborator behind a narrow interface:
//! - a [`RenderSink`] receives structural intents so a view layer can keep
//!   physical rows/cells in sync,
//! - a [`ClipboardProvider`] supplies parsed tabular payloads for paste,
//! - event callbacks receive exactly one [`TableEvent::Actioned`] per
//!   successful mutating command (after the mutation, never before) for
//!   recording by a history or collaboration layer.
//!
//! All commands are synchronous and atomic: on a precondition failure
//! (missing grid, unresolvable selection) they return `false` without
//! mutating anything or emitting an event.

mod actions;
mod clipboard;
mod editing;
mod engine;
mod render;

pub use actions::{EventCallback, EventCollector, TableAction, TableEvent};
pub use clipboard::{ClipboardPayload, ClipboardProvider, InMemoryClipboard};
pub use editing::paste::PasteOptions;
pub use engine::{ClearLatch, InsertPosition, TableEngine};
pub use render::{NoopRender, RenderIntent, RenderLog, RenderSink};
