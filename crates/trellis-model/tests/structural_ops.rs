use pretty_assertions::assert_eq;
use trellis_model::{Cell, CellCoord, Grid, GridError};

fn coord(row: usize, col: usize) -> CellCoord {
    CellCoord::new(row, col)
}

#[test]
fn inserting_inside_a_span_only_extends_that_anchor() {
    // 4x3 grid, a 3-row merge at (0,0) and an unrelated merge at (1,2).
    let mut grid = Grid::new(4, 3);
    grid.set_span(coord(0, 0), 3, 1).unwrap();
    grid.set_span(coord(1, 2), 2, 1).unwrap();

    // Insert 2 rows below row 1: the line sits strictly inside both merges.
    let report = grid.insert_rows(1, 2, false).unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert_eq!(report.index, 2);
    assert_eq!(grid.rows(), 6);
    assert_eq!(report.extended, vec![coord(0, 0), coord(1, 2)]);
    assert_eq!(grid.anchor(coord(0, 0)).row_span(), 5);
    assert_eq!(grid.anchor(coord(1, 2)).row_span(), 4);
    // The middle column is not merged; it gets fresh independent cells.
    assert_eq!(report.created, vec![coord(2, 1), coord(3, 1)]);
    assert!(!grid.cell(coord(2, 1)).is_placeholder());
}

#[test]
fn inserting_at_a_span_boundary_creates_independent_rows() {
    let mut grid = Grid::new(3, 2);
    grid.set_span(coord(0, 0), 2, 2).unwrap();

    // Below the merge's last row: not strictly inside, so the merge is
    // untouched and the new row copies the boundary cell's column span.
    let report = grid.insert_rows(1, 1, false).unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert_eq!(grid.anchor(coord(0, 0)).row_span(), 2);
    assert_eq!(report.extended, Vec::<CellCoord>::new());
    assert_eq!(report.created, vec![coord(2, 0)]);
    let fresh = grid.anchor(coord(2, 0));
    assert_eq!((fresh.row_span(), fresh.col_span()), (1, 2));
    assert_eq!(fresh.content, "");
    assert_eq!(grid.cell(coord(2, 1)), &Cell::Placeholder { parent: coord(2, 0) });
}

#[test]
fn inserting_above_the_first_span_row_is_not_a_crossing() {
    let mut grid = Grid::new(2, 1);
    grid.set_span(coord(0, 0), 2, 1).unwrap();

    grid.insert_rows(0, 1, true).unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert_eq!(grid.anchor(coord(0, 0)).row_span(), 1);
    assert_eq!(grid.anchor(coord(1, 0)).row_span(), 2);
}

#[test]
fn insertion_shifts_downstream_placeholder_parents() {
    let mut grid = Grid::new(4, 2);
    grid.set_span(coord(2, 0), 2, 2).unwrap();

    grid.insert_rows(0, 2, true).unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert_eq!(grid.anchor_coord(coord(5, 1)), coord(4, 0));
}

#[test]
fn removing_the_top_of_a_merge_preserves_the_tail() {
    // 3-row-tall merge at (0,0) with col_span 2; remove rows [0,1].
    let mut grid = Grid::new(4, 3);
    grid.anchor_mut(coord(0, 0)).content = "survives".into();
    grid.set_span(coord(0, 0), 3, 2).unwrap();

    let report = grid.remove_rows(0, 1).unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert_eq!(grid.rows(), 2);
    assert_eq!(report.relocated, vec![(coord(0, 0), coord(0, 0))]);
    let tail = grid.anchor(coord(0, 0));
    assert_eq!((tail.row_span(), tail.col_span()), (1, 2));
    assert_eq!(tail.content, "survives");
    assert_eq!(grid.cell(coord(0, 1)), &Cell::Placeholder { parent: coord(0, 0) });
}

#[test]
fn removing_the_bottom_of_a_merge_shrinks_it() {
    let mut grid = Grid::new(4, 2);
    grid.anchor_mut(coord(0, 0)).content = "kept".into();
    grid.set_span(coord(0, 0), 3, 1).unwrap();

    let report = grid.remove_rows(1, 2).unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert_eq!(grid.rows(), 2);
    assert_eq!(report.resized, vec![coord(0, 0)]);
    let anchor = grid.anchor(coord(0, 0));
    assert_eq!(anchor.row_span(), 1);
    assert_eq!(anchor.content, "kept");
}

#[test]
fn removing_the_middle_of_a_merge_bridges_it() {
    // Merge spans rows 0..4; removing rows [1,2] leaves a 2-row merge.
    let mut grid = Grid::new(5, 2);
    grid.set_span(coord(0, 0), 4, 2).unwrap();

    grid.remove_rows(1, 2).unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert_eq!(grid.rows(), 3);
    let anchor = grid.anchor(coord(0, 0));
    assert_eq!((anchor.row_span(), anchor.col_span()), (2, 2));
    assert_eq!(grid.anchor_coord(coord(1, 1)), coord(0, 0));
}

#[test]
fn remove_rows_refuses_to_empty_the_grid() {
    let mut grid = Grid::new(2, 2);
    assert_eq!(grid.remove_rows(0, 1), Err(GridError::WouldEmptyGrid));
    assert_eq!(grid.rows(), 2);
}

#[test]
fn column_ops_are_the_exact_transpose_of_row_ops() {
    let mut by_cols = Grid::new(3, 4);
    by_cols.anchor_mut(coord(0, 0)).content = "survives".into();
    by_cols.set_span(coord(0, 0), 2, 3).unwrap();

    let report = by_cols.remove_cols(0, 1).unwrap();
    assert_eq!(by_cols.check_invariants(), Ok(()));
    assert_eq!(by_cols.cols(), 2);
    assert_eq!(report.relocated, vec![(coord(0, 0), coord(0, 0))]);
    let tail = by_cols.anchor(coord(0, 0));
    assert_eq!((tail.row_span(), tail.col_span()), (2, 1));
    assert_eq!(tail.content, "survives");

    let mut inserted = Grid::new(2, 3);
    inserted.set_span(coord(0, 0), 1, 3).unwrap();
    let report = inserted.insert_cols(1, 2, false).unwrap();
    assert_eq!(inserted.check_invariants(), Ok(()));
    assert_eq!(inserted.cols(), 5);
    assert_eq!(report.extended, vec![coord(0, 0)]);
    assert_eq!(inserted.anchor(coord(0, 0)).col_span(), 5);
    // The unmerged second row got fresh independent cells.
    assert_eq!(report.created, vec![coord(1, 2), coord(1, 3)]);
}
