use pretty_assertions::assert_eq;
use trellis_engine::{ClearLatch, EventCollector, TableAction, TableEngine};
use trellis_model::{CellCoord, Grid, GridArea, TraversalOrder};

fn coord(row: usize, col: usize) -> CellCoord {
    CellCoord::new(row, col)
}

fn filled_engine(rows: usize, cols: usize) -> (TableEngine, EventCollector) {
    let mut grid = Grid::new(rows, cols);
    for at in grid.full_area().coords(TraversalOrder::Forward) {
        grid.anchor_mut(at).content = format!("c{}{}", at.row, at.col);
    }
    let mut engine = TableEngine::new(grid);
    let collector = EventCollector::new();
    engine.on_event(collector.callback());
    (engine, collector)
}

#[test]
fn plain_selection_clear_blanks_content_without_arming() {
    let (mut engine, collector) = filled_engine(3, 3);
    engine.select(coord(0, 0), coord(1, 1));

    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::Idle);

    let grid = engine.grid().unwrap();
    assert_eq!(grid.anchor(coord(0, 0)).content, "");
    assert_eq!(grid.anchor(coord(1, 1)).content, "");
    assert_eq!(grid.anchor(coord(2, 2)).content, "c22");
    assert_eq!(
        collector.actions(),
        vec![TableAction::Clear {
            area: GridArea::new(coord(0, 0), coord(1, 1))
        }]
    );
}

#[test]
fn second_whole_row_clear_removes_the_rows() {
    let (mut engine, collector) = filled_engine(3, 3);
    engine.select_rows(1, 1);

    // First press: blank and arm.
    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::RowsArmed);
    assert_eq!(engine.grid().unwrap().rows(), 3);
    assert_eq!(engine.grid().unwrap().anchor(coord(1, 0)).content, "");

    // Second press: fire.
    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::Idle);
    let grid = engine.grid().unwrap();
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.anchor(coord(1, 0)).content, "c20");

    assert_eq!(
        collector.actions(),
        vec![
            TableAction::Clear {
                area: GridArea::new(coord(1, 0), coord(1, 2))
            },
            TableAction::RemoveRows { index: 1, count: 1 },
        ]
    );
}

#[test]
fn second_whole_column_clear_removes_the_columns() {
    let (mut engine, _) = filled_engine(3, 3);
    engine.select_cols(0, 0);

    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::ColsArmed);
    assert!(engine.clear());
    assert_eq!(engine.grid().unwrap().cols(), 2);
    assert_eq!(engine.grid().unwrap().anchor(coord(0, 0)).content, "c01");
}

#[test]
fn second_whole_table_clear_removes_the_table() {
    let (mut engine, collector) = filled_engine(2, 2);
    engine.select_all();

    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::TableArmed);
    assert!(!engine.is_removed());

    assert!(engine.clear());
    assert!(engine.is_removed());
    // The arming clear is the only recorded action; table removal itself is
    // handled by the host's card layer.
    assert_eq!(collector.actions().len(), 1);
}

#[test]
fn a_clear_of_a_different_kind_rearms_instead_of_firing() {
    let (mut engine, _) = filled_engine(3, 3);
    engine.select_rows(0, 0);
    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::RowsArmed);

    // Switching to a whole-column selection must not fire the row latch;
    // one enum field makes overlapping armed states unrepresentable.
    engine.select_cols(0, 0);
    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::ColsArmed);
    assert_eq!(engine.grid().unwrap().rows(), 3);
    assert_eq!(engine.grid().unwrap().cols(), 3);
}

#[test]
fn any_other_successful_command_disarms_the_latch() {
    let (mut engine, _) = filled_engine(3, 3);
    engine.select_rows(1, 1);
    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::RowsArmed);

    assert!(engine.insert_rows_at(2, 1, false));
    assert_eq!(engine.clear_latch(), ClearLatch::Idle);

    // The next whole-row clear arms again instead of firing.
    engine.select_rows(1, 1);
    assert!(engine.clear());
    assert_eq!(engine.clear_latch(), ClearLatch::RowsArmed);
    assert_eq!(engine.grid().unwrap().rows(), 4);
}

#[test]
fn clear_format_strips_styles_only() {
    let mut grid = Grid::new(2, 2);
    grid.anchor_mut(coord(0, 0)).content = "text".into();
    grid.anchor_mut(coord(0, 0)).style = Some("color: red".into());
    let mut engine = TableEngine::new(grid);
    let collector = EventCollector::new();
    engine.on_event(collector.callback());

    engine.select(coord(0, 0), coord(1, 1));
    assert!(engine.clear_format());

    let grid = engine.grid().unwrap();
    assert_eq!(grid.anchor(coord(0, 0)).style, None);
    assert_eq!(grid.anchor(coord(0, 0)).content, "text");
    assert_eq!(
        collector.actions(),
        vec![TableAction::ClearFormat {
            area: GridArea::new(coord(0, 0), coord(1, 1))
        }]
    );
}
