use super::{InputEvent, Tool, ToolContext, ToolKind};

/// Eyedropper: clicking a placed tile selects it in the tile picker.
#[derive(Debug, Default)]
pub struct DropperTool;

impl Tool for DropperTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Dropper
    }

    fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>) {
        let InputEvent::PointerDown { pos, .. } = *event else {
            return;
        };
        let cell = cx.cell_at(pos);
        if let Some(tile) = cx.grid.get(cell) {
            let picked = tile.source_cell(cx.grid.cell_size());
            log::debug!("picked {picked:?} from {cell:?}");
            cx.signals.pick(picked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{Bench, FixedSource};
    use super::*;
    use crate::model::{CellPos, SourceCell};

    #[test]
    fn picks_the_source_cell_of_a_placed_tile() {
        let mut bench = Bench::new(4, 4, FixedSource::with(&[]));
        let tile = bench.source.tile(3, 2);
        bench.grid.set(CellPos::new(1, 1), tile);
        bench.down(&mut DropperTool, 20.0, 30.0);
        assert_eq!(bench.signals.take_picked(), Some(SourceCell { x: 3, y: 2 }));
        assert_eq!(bench.grid.occupied_count(), 1);
    }

    #[test]
    fn empty_or_outside_cells_pick_nothing() {
        let mut bench = Bench::new(2, 2, FixedSource::with(&[]));
        bench.down(&mut DropperTool, 8.0, 8.0);
        bench.down(&mut DropperTool, -8.0, 8.0);
        assert_eq!(bench.signals.take_picked(), None);
        assert!(!bench.signals.repaint_requested());
    }
}
