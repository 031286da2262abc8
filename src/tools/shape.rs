use eframe::egui;

use super::{InputEvent, Tool, ToolContext, ToolKind};
use crate::grid::TileGrid;
use crate::model::CellPos;
use crate::render::{Surface, stroke_dashed_line, stroke_dashed_rect};
use crate::view::ViewTransform;

const PREVIEW_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0x7b, 0xff);
const PREVIEW_WIDTH: f32 = 2.0;
const PREVIEW_DASH: f32 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    #[default]
    Rectangle,
    Ellipse,
}

/// Cells covered by `kind` between two corner cells, in paint order.
pub fn rasterize(kind: ShapeKind, a: CellPos, b: CellPos) -> Vec<CellPos> {
    match kind {
        ShapeKind::Line => line_cells(a, b),
        ShapeKind::Rectangle => rect_cells(a, b),
        ShapeKind::Ellipse => ellipse_cells(a, b),
    }
}

/// Integer Bresenham, 8-connected, endpoints included.
pub fn line_cells(a: CellPos, b: CellPos) -> Vec<CellPos> {
    let (mut x, mut y) = (a.col, a.row);
    let dx = (b.col - a.col).abs();
    let dy = -(b.row - a.row).abs();
    let sx = if a.col < b.col { 1 } else { -1 };
    let sy = if a.row < b.row { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::with_capacity((dx - dy + 1) as usize);
    loop {
        cells.push(CellPos::new(x, y));
        if x == b.col && y == b.row {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

fn bounds(a: CellPos, b: CellPos) -> (CellPos, CellPos) {
    (
        CellPos::new(a.col.min(b.col), a.row.min(b.row)),
        CellPos::new(a.col.max(b.col), a.row.max(b.row)),
    )
}

/// Every cell of the inclusive bounding box.
pub fn rect_cells(a: CellPos, b: CellPos) -> Vec<CellPos> {
    let (min, max) = bounds(a, b);
    (min.row..=max.row)
        .flat_map(|r| (min.col..=max.col).map(move |c| CellPos::new(c, r)))
        .collect()
}

/// Axis-aligned ellipse fit to the bounding box. A zero radius collapses to
/// a line along the other axis; both zero leaves just the centre.
pub fn ellipse_cells(a: CellPos, b: CellPos) -> Vec<CellPos> {
    let (min, max) = bounds(a, b);
    let rx = i64::from((max.col - min.col) / 2);
    let ry = i64::from((max.row - min.row) / 2);
    let cx = i64::from(min.col) + rx;
    let cy = i64::from(min.row) + ry;

    let inside = |c: i32, r: i32| {
        let dx = i64::from(c) - cx;
        let dy = i64::from(r) - cy;
        match (rx, ry) {
            (0, 0) => dx == 0 && dy == 0,
            (0, _) => dx == 0 && dy * dy <= ry * ry,
            (_, 0) => dy == 0 && dx * dx <= rx * rx,
            _ => dx * dx * ry * ry + dy * dy * rx * rx <= rx * rx * ry * ry,
        }
    };

    rect_cells(min, max)
        .into_iter()
        .filter(|cell| inside(cell.col, cell.row))
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum ShapeState {
    #[default]
    Idle,
    Drawing {
        start: egui::Pos2,
        end: egui::Pos2,
    },
}

/// Drag out a line, rectangle or ellipse; cells are painted on release.
#[derive(Debug, Default)]
pub struct ShapeTool {
    shape: ShapeKind,
    state: ShapeState,
}

impl ShapeTool {
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            state: ShapeState::Idle,
        }
    }

    fn commit(&self, start: egui::Pos2, end: egui::Pos2, cx: &mut ToolContext<'_>) {
        let Some(tile) = cx.tile_to_paint() else {
            return;
        };
        let size = cx.grid.cell_size();
        let a = CellPos::containing(start, size);
        let b = CellPos::containing(end, size);
        let mut painted = 0;
        for cell in rasterize(self.shape, a, b) {
            if cx.draw_at(cell, tile) {
                painted += 1;
            }
        }
        log::debug!("{:?} {a:?}..{b:?} painted {painted} cells", self.shape);
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Shape(self.shape)
    }

    fn enable(&mut self, cx: &mut ToolContext<'_>) {
        self.state = ShapeState::Idle;
        cx.signals.request_repaint();
    }

    fn disable(&mut self, cx: &mut ToolContext<'_>) {
        self.state = ShapeState::Idle;
        cx.signals.request_repaint();
    }

    fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>) {
        match (*event, self.state) {
            (InputEvent::PointerDown { pos, .. }, _) => {
                if cx.tile_to_paint().is_none() {
                    return;
                }
                let start = cx.grid_point(pos);
                self.state = ShapeState::Drawing { start, end: start };
            }
            (InputEvent::PointerMove { pos, .. }, ShapeState::Drawing { start, .. }) => {
                self.state = ShapeState::Drawing {
                    start,
                    end: cx.grid_point(pos),
                };
                cx.signals.request_repaint();
            }
            (InputEvent::PointerUp { .. }, ShapeState::Drawing { start, end }) => {
                self.state = ShapeState::Idle;
                self.commit(start, end, cx);
                cx.signals.request_repaint();
            }
            _ => {}
        }
    }

    fn draw_overlay(&self, surface: &mut dyn Surface, view: &ViewTransform, _grid: &TileGrid) {
        let ShapeState::Drawing { start, end } = self.state else {
            return;
        };
        let width = PREVIEW_WIDTH / view.scale();
        let dash = PREVIEW_DASH / view.scale();
        match self.shape {
            ShapeKind::Line => {
                stroke_dashed_line(surface, start, end, width, PREVIEW_COLOR, dash, dash);
            }
            ShapeKind::Rectangle | ShapeKind::Ellipse => {
                let rect = egui::Rect::from_two_pos(start, end);
                stroke_dashed_rect(surface, rect, width, PREVIEW_COLOR, dash);
            }
        }
    }
}
