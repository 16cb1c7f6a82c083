//! The structural command implementations, grouped by concern:
//! row/column geometry, merge/split, and clipboard paste/tiling.

pub(crate) mod merge;
pub(crate) mod paste;
pub(crate) mod structural;
