use super::{InputEvent, Tool, ToolContext, ToolKind};

/// Paints the first selected tile into every cell the pointer passes over.
#[derive(Debug, Default)]
pub struct FreeDrawTool {
    drawing: bool,
}

impl FreeDrawTool {
    fn paint(&mut self, pos: eframe::egui::Pos2, cx: &mut ToolContext<'_>) {
        let Some(tile) = cx.tile_to_paint() else {
            self.drawing = false;
            return;
        };
        let cell = cx.cell_at(pos);
        cx.draw_at(cell, tile);
    }
}

impl Tool for FreeDrawTool {
    fn kind(&self) -> ToolKind {
        ToolKind::FreeDraw
    }

    fn disable(&mut self, _cx: &mut ToolContext<'_>) {
        self.drawing = false;
    }

    fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>) {
        match *event {
            InputEvent::PointerDown { pos, .. } => {
                self.drawing = true;
                self.paint(pos, cx);
            }
            InputEvent::PointerMove { pos, .. } if self.drawing => self.paint(pos, cx),
            InputEvent::PointerUp { .. } => self.drawing = false,
            _ => {}
        }
    }
}

/// Clears every cell the pointer passes over.
#[derive(Debug, Default)]
pub struct EraseTool {
    drawing: bool,
}

impl Tool for EraseTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Erase
    }

    fn disable(&mut self, _cx: &mut ToolContext<'_>) {
        self.drawing = false;
    }

    fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>) {
        match *event {
            InputEvent::PointerDown { pos, .. } => {
                self.drawing = true;
                let cell = cx.cell_at(pos);
                cx.erase_at(cell);
            }
            InputEvent::PointerMove { pos, .. } if self.drawing => {
                let cell = cx.cell_at(pos);
                cx.erase_at(cell);
            }
            InputEvent::PointerUp { .. } => self.drawing = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Declined;
    use super::super::testing::{Bench, FixedSource};
    use super::*;
    use crate::model::CellPos;

    #[test]
    fn free_draw_paints_along_the_drag_only() {
        let mut bench = Bench::new(4, 4, FixedSource::with(&[(1, 0)]));
        let mut tool = FreeDrawTool::default();
        bench.drag_to(&mut tool, 8.0, 8.0);
        assert_eq!(bench.grid.occupied_count(), 0);

        bench.down(&mut tool, 8.0, 8.0);
        bench.drag_to(&mut tool, 24.0, 8.0);
        bench.drag_to(&mut tool, 200.0, 8.0);
        bench.up(&mut tool, 24.0, 24.0);
        bench.drag_to(&mut tool, 40.0, 40.0);

        let tile = bench.source.tile(1, 0);
        let cells: Vec<_> = bench.grid.occupied().collect();
        assert_eq!(
            cells,
            vec![(CellPos::new(0, 0), tile), (CellPos::new(1, 0), tile)]
        );
    }

    #[test]
    fn free_draw_declines_without_a_tile() {
        let mut bench = Bench::new(4, 4, FixedSource::with(&[]));
        let mut tool = FreeDrawTool::default();
        bench.down(&mut tool, 8.0, 8.0);
        bench.drag_to(&mut tool, 24.0, 8.0);
        assert_eq!(bench.grid.occupied_count(), 0);
        assert_eq!(bench.signals.take_advisory(), Some(Declined::NoTileSelected));
        assert!(!bench.signals.repaint_requested());
    }

    #[test]
    fn erase_clears_cells_and_ignores_outside() {
        let mut bench = Bench::new(3, 1, FixedSource::with(&[(0, 0)]));
        let tile = bench.source.tile(0, 0);
        for c in 0..3 {
            bench.grid.set(CellPos::new(c, 0), tile);
        }
        let mut tool = EraseTool::default();
        bench.down(&mut tool, -5.0, 8.0);
        bench.drag_to(&mut tool, 8.0, 8.0);
        bench.drag_to(&mut tool, 20.0, 8.0);
        bench.up(&mut tool, 20.0, 8.0);
        assert_eq!(
            bench.grid.occupied().map(|(c, _)| c).collect::<Vec<_>>(),
            vec![CellPos::new(2, 0)]
        );
    }
}
