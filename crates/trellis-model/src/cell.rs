use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// A cell that owns content and declares its own row/column span.
///
/// `content` and `style` are opaque markup fragments owned by the host
/// editor; the model never interprets them beyond whitespace trimming during
/// merges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorCell {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default = "unit_span", skip_serializing_if = "is_unit_span")]
    row_span: usize,
    #[serde(default = "unit_span", skip_serializing_if = "is_unit_span")]
    col_span: usize,
}

fn unit_span() -> usize {
    1
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if signature
fn is_unit_span(span: &usize) -> bool {
    *span == 1
}

impl Default for AnchorCell {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorCell {
    /// An empty 1x1 cell.
    pub fn new() -> Self {
        Self {
            content: String::new(),
            style: None,
            row_span: 1,
            col_span: 1,
        }
    }

    /// An otherwise empty 1x1 cell with the given content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new()
        }
    }

    /// Fresh 1-row cell copying only a column span; used when row insertion
    /// clones the boundary row's shape (but never its content).
    pub(crate) fn unit_row(col_span: usize) -> Self {
        debug_assert!(col_span >= 1);
        Self {
            col_span,
            ..Self::new()
        }
    }

    #[inline]
    pub fn row_span(&self) -> usize {
        self.row_span
    }

    #[inline]
    pub fn col_span(&self) -> usize {
        self.col_span
    }

    /// `true` iff the cell covers more than its own coordinate.
    #[inline]
    pub fn is_multi(&self) -> bool {
        self.row_span * self.col_span > 1
    }

    /// `true` iff the trimmed content is empty. Merge skips such cells when
    /// concatenating content.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Raw span write. Callers are responsible for restoring grid coverage;
    /// everything outside this crate goes through [`crate::Grid::set_span`].
    pub(crate) fn set_spans(&mut self, row_span: usize, col_span: usize) {
        debug_assert!(row_span >= 1 && col_span >= 1);
        self.row_span = row_span;
        self.col_span = col_span;
    }

    pub(crate) fn transposed(&self) -> Self {
        Self {
            content: self.content.clone(),
            style: self.style.clone(),
            row_span: self.col_span,
            col_span: self.row_span,
        }
    }

    pub(crate) fn with_spans(&self, row_span: usize, col_span: usize) -> Self {
        debug_assert!(row_span >= 1 && col_span >= 1);
        Self {
            content: self.content.clone(),
            style: self.style.clone(),
            row_span,
            col_span,
        }
    }
}

/// One logical grid cell.
///
/// The two variants are deliberately exhaustive: every call site has to
/// decide what a placeholder means for it, instead of discovering a missing
/// attribute at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Owns content and span; see [`AnchorCell`].
    Anchor(AnchorCell),
    /// Covered by a neighboring anchor's span. Carries no content and no
    /// rendering element of its own; `parent` always names the anchor
    /// directly (placeholders never chain).
    Placeholder { parent: CellCoord },
}

impl Cell {
    pub(crate) fn placeholder(parent: CellCoord) -> Self {
        Cell::Placeholder { parent }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cell::Placeholder { .. })
    }

    pub fn as_anchor(&self) -> Option<&AnchorCell> {
        match self {
            Cell::Anchor(anchor) => Some(anchor),
            Cell::Placeholder { .. } => None,
        }
    }

    pub fn as_anchor_mut(&mut self) -> Option<&mut AnchorCell> {
        match self {
            Cell::Anchor(anchor) => Some(anchor),
            Cell::Placeholder { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_anchor_is_never_multi() {
        let cell = AnchorCell::with_content("x");
        assert_eq!(cell.row_span(), 1);
        assert_eq!(cell.col_span(), 1);
        assert!(!cell.is_multi());
    }

    #[test]
    fn anchor_accessors_distinguish_the_variants() {
        let mut cell = Cell::Anchor(AnchorCell::with_content("x"));
        cell.as_anchor_mut().unwrap().content.push('y');
        assert_eq!(cell.as_anchor().unwrap().content, "xy");

        let mut covered = Cell::Placeholder {
            parent: CellCoord::new(0, 0),
        };
        assert!(covered.is_placeholder());
        assert!(covered.as_anchor().is_none());
        assert!(covered.as_anchor_mut().is_none());
    }

    #[test]
    fn span_serde_defaults_to_unit() {
        let cell: AnchorCell = serde_json::from_str(r#"{ "content": "a" }"#).unwrap();
        assert_eq!(cell.row_span(), 1);
        assert_eq!(cell.col_span(), 1);

        // 1x1 spans are omitted on the wire.
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "a" }));
    }
}
