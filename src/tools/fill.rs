use std::collections::HashSet;

use super::{InputEvent, Tool, ToolContext, ToolKind};
use crate::grid::TileGrid;
use crate::model::{CellPos, Tile};

/// 4-connected flood fill from `start`, replacing the region whose content
/// matches the start cell's original content. Returns the number of cells
/// painted.
pub fn flood_fill(grid: &mut TileGrid, start: CellPos, tile: Tile) -> usize {
    if !grid.in_bounds(start) {
        return 0;
    }
    let original = grid.get(start);
    if original == Some(tile) {
        return 0;
    }

    let mut painted = 0;
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(cell) = stack.pop() {
        if !visited.insert(cell) || !grid.in_bounds(cell) || grid.get(cell) != original {
            continue;
        }
        grid.set(cell, tile);
        painted += 1;
        let CellPos { col, row } = cell;
        stack.extend([
            CellPos::new(col + 1, row),
            CellPos::new(col - 1, row),
            CellPos::new(col, row + 1),
            CellPos::new(col, row - 1),
        ]);
    }
    painted
}

/// Fills the region under the pointer with the first selected tile.
#[derive(Debug, Default)]
pub struct FillTool;

impl Tool for FillTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Fill
    }

    fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>) {
        let InputEvent::PointerDown { pos, .. } = *event else {
            return;
        };
        let Some(tile) = cx.tile_to_paint() else {
            return;
        };
        let start = cx.cell_at(pos);
        let painted = flood_fill(cx.grid, start, tile);
        log::debug!("fill at {start:?} painted {painted} cells");
        if painted > 0 {
            cx.signals.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{Bench, FixedSource};
    use super::*;
    use crate::model::ImageHandle;

    fn tile(x: u32) -> Tile {
        Tile {
            image: ImageHandle(1),
            source_x: x,
            source_y: 0,
        }
    }

    #[test]
    fn filling_with_the_same_tile_changes_nothing() {
        let mut grid = TileGrid::new(3, 3, 16);
        grid.set(CellPos::new(1, 1), tile(0));
        let before = grid.clone();
        assert_eq!(flood_fill(&mut grid, CellPos::new(1, 1), tile(0)), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn out_of_bounds_start_changes_nothing() {
        let mut grid = TileGrid::new(3, 3, 16);
        assert_eq!(flood_fill(&mut grid, CellPos::new(-1, 0), tile(0)), 0);
        assert_eq!(flood_fill(&mut grid, CellPos::new(0, 3), tile(0)), 0);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn fill_stops_at_differing_cells() {
        // wall down column 2 of a 5x3 grid
        let mut grid = TileGrid::new(5, 3, 16);
        for r in 0..3 {
            grid.set(CellPos::new(2, r), tile(16));
        }
        let painted = flood_fill(&mut grid, CellPos::new(0, 0), tile(32));
        assert_eq!(painted, 6);
        for (cell, t) in grid.occupied() {
            match cell.col {
                0 | 1 => assert_eq!(t, tile(32)),
                2 => assert_eq!(t, tile(16)),
                _ => panic!("leaked into {cell:?}"),
            }
        }
    }

    #[test]
    fn fill_follows_four_connected_paths_not_diagonals() {
        // (0,1) only touches (1,2) diagonally
        let mut grid = TileGrid::new(3, 3, 16);
        for cell in [(1, 0), (2, 0), (1, 1), (2, 1), (0, 2), (1, 2)] {
            grid.set(CellPos::new(cell.0, cell.1), tile(16));
        }
        grid.clear(CellPos::new(1, 2));
        // empty: (0,0) (0,1) (1,2) (2,2)
        let painted = flood_fill(&mut grid, CellPos::new(1, 2), tile(48));
        assert_eq!(painted, 2);
        assert_eq!(grid.get(CellPos::new(2, 2)), Some(tile(48)));
        assert_eq!(grid.get(CellPos::new(0, 1)), None);
        assert_eq!(grid.get(CellPos::new(0, 0)), None);
    }

    #[test]
    fn fill_from_a_lone_tile_changes_only_that_cell() {
        let mut grid = TileGrid::new(5, 5, 16);
        let centre = CellPos::new(2, 2);
        grid.set(centre, tile(0));
        assert_eq!(flood_fill(&mut grid, centre, tile(16)), 1);
        assert_eq!(grid.get(centre), Some(tile(16)));
        assert_eq!(grid.occupied_count(), 1);
        for row in 0..5 {
            for col in 0..5 {
                let cell = CellPos::new(col, row);
                if cell != centre {
                    assert_eq!(grid.get(cell), None, "{cell:?} was painted");
                }
            }
        }
    }

    #[test]
    fn fill_paints_exactly_an_l_shaped_region() {
        // L down column 1 then along row 3, inside a background of tile(0)
        let l_shape =
            [(1, 0), (1, 1), (1, 2), (1, 3), (2, 3), (3, 3)].map(|(c, r)| CellPos::new(c, r));
        let mut background = TileGrid::new(5, 5, 16);
        for row in 0..5 {
            for col in 0..5 {
                background.set(CellPos::new(col, row), tile(0));
            }
        }
        for cell in l_shape {
            background.set(cell, tile(16));
        }

        for start in l_shape {
            let mut grid = background.clone();
            assert_eq!(flood_fill(&mut grid, start, tile(32)), l_shape.len());
            for (cell, t) in grid.occupied() {
                let expected = if l_shape.contains(&cell) {
                    tile(32)
                } else {
                    tile(0)
                };
                assert_eq!(t, expected, "{cell:?} from start {start:?}");
            }
            assert_eq!(grid.occupied_count(), 25);
        }
    }

    #[test]
    fn fill_replaces_a_tile_region() {
        let mut grid = TileGrid::new(2, 2, 16);
        for r in 0..2 {
            for c in 0..2 {
                grid.set(CellPos::new(c, r), tile(0));
            }
        }
        assert_eq!(flood_fill(&mut grid, CellPos::new(1, 1), tile(16)), 4);
        assert!(grid.occupied().all(|(_, t)| t == tile(16)));
    }

    #[test]
    fn tool_fills_a_five_by_five_grid_from_the_centre() {
        let mut bench = Bench::new(5, 5, FixedSource::with(&[(3, 0), (4, 0)]));
        let mut tool = FillTool;
        bench.down(&mut tool, 2.5 * 16.0, 2.5 * 16.0);
        let expected = bench.source.tile(3, 0);
        assert_eq!(bench.grid.occupied_count(), 25);
        assert!(bench.grid.occupied().all(|(_, t)| t == expected));
        assert_eq!(bench.signals.take_repaints(), 1);

        bench.down(&mut tool, 8.0, 8.0);
        assert_eq!(bench.signals.take_repaints(), 0);
    }

    #[test]
    fn tool_declines_without_a_sheet() {
        let mut source = FixedSource::with(&[(0, 0)]);
        source.image = None;
        let mut bench = Bench::new(3, 3, source);
        bench.down(&mut FillTool, 8.0, 8.0);
        assert_eq!(bench.grid.occupied_count(), 0);
        assert_eq!(
            bench.signals.take_advisory(),
            Some(super::super::Declined::SheetNotLoaded)
        );
    }
}
