use eframe::egui;

use crate::grid::TileGrid;
use crate::model::{CellPos, ImageHandle, Rgba};
use crate::view::ViewTransform;

/// Logical width of a grid line at scale 1.
pub const GRID_LINE_WIDTH: f32 = 0.5;

/// Drawing primitives the renderer needs. All coordinates are logical grid
/// pixels; the surface applies the transform it was last given.
pub trait Surface {
    fn set_transform(&mut self, view: &ViewTransform);
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: egui::Rect, color: egui::Color32);
    fn line(&mut self, a: egui::Pos2, b: egui::Pos2, width: f32, color: egui::Color32);
    fn blit(&mut self, image: ImageHandle, source: egui::Rect, dest: egui::Rect);
}

/// Anything that paints on top of the base layer, in the same transform.
pub trait Overlay {
    fn draw_overlay(&self, surface: &mut dyn Surface, view: &ViewTransform, grid: &TileGrid);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridStyle {
    pub background: egui::Color32,
    pub line_color: egui::Color32,
    pub show_grid: bool,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            background: Rgba::opaque(0x36, 0x39, 0x3f).to_color32(),
            line_color: Rgba::opaque(0x5d, 0x61, 0x68).to_color32(),
            show_grid: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GridRenderer {
    pub style: GridStyle,
}

impl GridRenderer {
    pub fn new(style: GridStyle) -> Self {
        Self { style }
    }

    pub fn draw_frame(
        &self,
        surface: &mut dyn Surface,
        view: &ViewTransform,
        grid: &TileGrid,
        overlay: Option<&dyn Overlay>,
    ) {
        surface.clear();
        surface.set_transform(view);

        let size = grid.pixel_size();
        surface.fill_rect(
            egui::Rect::from_min_size(egui::Pos2::ZERO, size),
            self.style.background,
        );

        let cell = grid.cell_size();
        for (pos, tile) in grid.occupied() {
            surface.blit(tile.image, tile.source_rect(cell), pos.rect(cell));
        }

        if self.style.show_grid {
            self.draw_grid_lines(surface, view, grid);
        }

        if let Some(overlay) = overlay {
            overlay.draw_overlay(surface, view, grid);
        }
    }

    fn draw_grid_lines(&self, surface: &mut dyn Surface, view: &ViewTransform, grid: &TileGrid) {
        let width = GRID_LINE_WIDTH / view.scale();
        let size = grid.pixel_size();
        let color = self.style.line_color;
        for c in 0..=grid.cols() as i32 {
            let x = CellPos::new(c, 0).origin(grid.cell_size()).x;
            surface.line(egui::pos2(x, 0.0), egui::pos2(x, size.y), width, color);
        }
        for r in 0..=grid.rows() as i32 {
            let y = CellPos::new(0, r).origin(grid.cell_size()).y;
            surface.line(egui::pos2(0.0, y), egui::pos2(size.x, y), width, color);
        }
    }
}

/// Dashed stroke made of plain segments. Lengths are logical.
pub fn stroke_dashed_line(
    surface: &mut dyn Surface,
    a: egui::Pos2,
    b: egui::Pos2,
    width: f32,
    color: egui::Color32,
    dash_len: f32,
    gap_len: f32,
) {
    let v = b - a;
    let len = v.length();
    if len <= f32::EPSILON || dash_len <= f32::EPSILON {
        return;
    }
    let dir = v / len;
    let mut pos = 0.0;
    let mut drawing = true;
    while pos < len {
        let step = if drawing { dash_len } else { gap_len.max(f32::EPSILON) };
        let next = (pos + step).min(len);
        if drawing {
            surface.line(a + dir * pos, a + dir * next, width, color);
        }
        pos = next;
        drawing = !drawing;
    }
}

pub fn stroke_dashed_rect(
    surface: &mut dyn Surface,
    rect: egui::Rect,
    width: f32,
    color: egui::Color32,
    dash_len: f32,
) {
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    for i in 0..4 {
        stroke_dashed_line(
            surface,
            corners[i],
            corners[(i + 1) % 4],
            width,
            color,
            dash_len,
            dash_len,
        );
    }
}
