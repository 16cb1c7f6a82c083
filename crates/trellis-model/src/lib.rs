//! `trellis-model` defines the logical table grid used by the Trellis table
//! editor: a dense matrix of cells with merged-cell (span) bookkeeping, plus
//! the selection rectangle commands operate on.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the structural edit-command engine (`trellis-engine`)
//! - HTML import/export layers owned by the host editor
//! - history/collaboration transports via `serde` (JSON-safe schema)
//!
//! The grid is *logical*: every coordinate in `[0, rows) x [0, cols)` maps to
//! exactly one cell, regardless of how many physical elements a renderer
//! currently keeps alive. A merged cell is represented by one [`AnchorCell`]
//! plus [`Cell::Placeholder`] entries for every other coordinate it covers.

mod area;
mod cell;
mod coord;
mod grid;
mod selection;

pub use area::{Axis, GridArea, TraversalOrder};
pub use cell::{AnchorCell, Cell};
pub use coord::CellCoord;
pub use grid::{
    ColInsertion, ColRemoval, Grid, GridError, InvariantViolation, RowInsertion, RowRemoval,
};
pub use selection::Selection;
