use pretty_assertions::assert_eq;
use trellis_engine::{EventCollector, TableAction, TableEngine};
use trellis_model::{Cell, CellCoord, Grid, GridArea, TraversalOrder};

fn coord(row: usize, col: usize) -> CellCoord {
    CellCoord::new(row, col)
}

fn engine_with_collector(grid: Grid) -> (TableEngine, EventCollector) {
    let mut engine = TableEngine::new(grid);
    let collector = EventCollector::new();
    engine.on_event(collector.callback());
    (engine, collector)
}

#[test]
fn merge_concatenates_content_in_document_order_before_the_anchor() {
    let mut grid = Grid::new(2, 2);
    grid.anchor_mut(coord(0, 0)).content = "A".into();
    grid.anchor_mut(coord(0, 1)).content = "B".into();
    grid.anchor_mut(coord(1, 0)).content = "  ".into(); // blank, skipped
    grid.anchor_mut(coord(1, 1)).content = "D".into();
    let (mut engine, collector) = engine_with_collector(grid);

    engine.select(coord(0, 0), coord(1, 1));
    assert!(engine.merge_cells());

    let grid = engine.grid().unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    let anchor = grid.anchor(coord(0, 0));
    assert_eq!((anchor.row_span(), anchor.col_span()), (2, 2));
    // Absorbed cells in document order, prepended to the anchor's content.
    assert_eq!(anchor.content, "BDA");
    for at in [coord(0, 1), coord(1, 0), coord(1, 1)] {
        assert_eq!(grid.cell(at), &Cell::Placeholder { parent: coord(0, 0) });
    }
    assert_eq!(
        collector.actions(),
        vec![TableAction::MergeCells {
            area: GridArea::new(coord(0, 0), coord(1, 1))
        }]
    );
    // The rectangle stays selected.
    assert_eq!(
        engine.selection().unwrap().area(),
        GridArea::new(coord(0, 0), coord(1, 1))
    );
}

#[test]
fn merge_then_split_restores_the_cell_layout() {
    let mut grid = Grid::new(3, 3);
    for at in grid.full_area().coords(TraversalOrder::Forward) {
        grid.anchor_mut(at).content = format!("c{}{}", at.row, at.col);
    }
    let (mut engine, collector) = engine_with_collector(grid);

    let area = GridArea::new(coord(0, 0), coord(1, 1));
    engine.select(area.begin, area.end);
    assert!(engine.merge_cells());
    assert!(engine.split_cells());

    let grid = engine.grid().unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    // Every coordinate is an independent 1x1 cell again.
    assert_eq!(grid.anchors().count(), 9);
    for at in grid.full_area().coords(TraversalOrder::Forward) {
        assert!(!grid.cell(at).is_placeholder());
    }
    // Content survives as one concatenation on the anchor; the split cells
    // come back empty.
    assert_eq!(grid.anchor(coord(0, 0)).content, "c01c10c11c00");
    assert_eq!(grid.anchor(coord(0, 1)).content, "");
    // Untouched cells keep their content.
    assert_eq!(grid.anchor(coord(2, 2)).content, "c22");

    assert_eq!(
        collector.actions(),
        vec![
            TableAction::MergeCells { area },
            TableAction::SplitCells { area },
        ]
    );
}

#[test]
fn merge_runs_an_implicit_split_over_partial_merges() {
    // A 1x2 merge sits entirely inside the 2x2 merge target.
    let mut grid = Grid::new(2, 2);
    grid.anchor_mut(coord(0, 0)).content = "wide".into();
    grid.set_span(coord(0, 0), 1, 2).unwrap();
    grid.anchor_mut(coord(1, 0)).content = "solo".into();
    let (mut engine, _) = engine_with_collector(grid);

    engine.select(coord(0, 0), coord(1, 1));
    assert!(engine.merge_cells());

    let grid = engine.grid().unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    let anchor = grid.anchor(coord(0, 0));
    assert_eq!((anchor.row_span(), anchor.col_span()), (2, 2));
    assert_eq!(anchor.content, "solowide");
}

#[test]
fn merge_rejects_cells_covered_from_outside_the_selection() {
    let mut grid = Grid::new(2, 3);
    grid.set_span(coord(0, 0), 1, 2).unwrap();
    let (mut engine, collector) = engine_with_collector(grid.clone());

    // (0,1) belongs to the merge anchored at (0,0), outside the rectangle.
    engine.select(coord(0, 1), coord(1, 2));
    assert!(!engine.merge_cells());
    assert_eq!(engine.grid().unwrap(), &grid);
    assert_eq!(collector.events(), vec![]);
}

#[test]
fn split_without_merged_cells_is_a_noop() {
    let (mut engine, collector) = engine_with_collector(Grid::new(2, 2));
    engine.select(coord(0, 0), coord(1, 1));
    assert!(!engine.split_cells());
    assert_eq!(collector.events(), vec![]);
}

#[test]
fn splitting_a_single_selected_merge_dissolves_its_whole_extent() {
    let mut grid = Grid::new(3, 3);
    grid.anchor_mut(coord(1, 1)).content = "kept".into();
    grid.set_span(coord(1, 1), 2, 2).unwrap();
    let (mut engine, _) = engine_with_collector(grid);

    // Selecting just the anchor coordinate splits the full 2x2 extent.
    engine.select_cell(coord(1, 1));
    assert!(engine.split_cells());

    let grid = engine.grid().unwrap();
    assert_eq!(grid.check_invariants(), Ok(()));
    assert!(!grid.anchor(coord(1, 1)).is_multi());
    assert_eq!(grid.anchor(coord(1, 1)).content, "kept");
    assert!(!grid.cell(coord(2, 2)).is_placeholder());
}
