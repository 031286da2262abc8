use eframe::egui;

use crate::model::{ImageHandle, SourceCell};
use crate::tools::TileSource;

/// A decoded source image the host has registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetImage {
    pub handle: ImageHandle,
    pub width: u32,
    pub height: u32,
}

/// Tile picker state: the loaded sheet, the picked anchor cell and the size
/// of the block that gets painted from it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileSheet {
    image: Option<SheetImage>,
    cell_size: u32,
    anchor: Option<SourceCell>,
    selection_width: u32,
    selection_height: u32,
}

impl TileSheet {
    pub fn new(cell_size: u32) -> Self {
        Self {
            image: None,
            cell_size: cell_size.max(1),
            anchor: None,
            selection_width: 1,
            selection_height: 1,
        }
    }

    /// Swap in a new sheet. The previous pick is dropped.
    pub fn attach(&mut self, image: SheetImage) {
        log::info!(
            "tile sheet {}x{} px, {}x{} cells",
            image.width,
            image.height,
            image.width.div_ceil(self.cell_size),
            image.height.div_ceil(self.cell_size)
        );
        self.image = Some(image);
        self.anchor = None;
    }

    pub fn sheet(&self) -> Option<SheetImage> {
        self.image
    }

    pub fn is_ready(&self) -> bool {
        self.image.is_some()
    }

    pub fn columns(&self) -> u32 {
        self.image.map_or(0, |i| i.width.div_ceil(self.cell_size))
    }

    pub fn rows(&self) -> u32 {
        self.image.map_or(0, |i| i.height.div_ceil(self.cell_size))
    }

    pub fn anchor(&self) -> Option<SourceCell> {
        self.anchor
    }

    pub fn selection_size(&self) -> (u32, u32) {
        (self.selection_width, self.selection_height)
    }

    /// Pick `cell` as the anchor. Cells outside the sheet are ignored.
    pub fn select(&mut self, cell: SourceCell) -> bool {
        if cell.x >= self.columns() || cell.y >= self.rows() {
            return false;
        }
        self.anchor = Some(cell);
        true
    }

    /// Returns false, leaving the size unchanged, when either side is zero.
    pub fn set_selection_size(&mut self, width: u32, height: u32) -> bool {
        if width < 1 || height < 1 {
            log::warn!("ignoring selection size {width}x{height}; both sides must be at least 1");
            return false;
        }
        self.selection_width = width;
        self.selection_height = height;
        true
    }

    /// Sheet cell under a point given in sheet pixels.
    pub fn cell_at(&self, p: egui::Pos2) -> Option<SourceCell> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let size = self.cell_size as f32;
        let cell = SourceCell {
            x: (p.x / size).floor() as u32,
            y: (p.y / size).floor() as u32,
        };
        (cell.x < self.columns() && cell.y < self.rows()).then_some(cell)
    }

    /// Sheet-pixel rectangle covered by the current pick.
    pub fn selection_rect(&self) -> Option<egui::Rect> {
        let anchor = self.anchor?;
        let size = self.cell_size as f32;
        Some(egui::Rect::from_min_size(
            egui::pos2(anchor.x as f32 * size, anchor.y as f32 * size),
            egui::vec2(
                self.selection_width as f32 * size,
                self.selection_height as f32 * size,
            ),
        ))
    }
}

impl TileSource for TileSheet {
    fn image(&self) -> Option<ImageHandle> {
        self.image.map(|i| i.handle)
    }

    fn cell_size(&self) -> u32 {
        self.cell_size
    }

    fn selected_tiles(&self) -> Vec<SourceCell> {
        let Some(anchor) = self.anchor else {
            return Vec::new();
        };
        (0..self.selection_height)
            .flat_map(|j| {
                (0..self.selection_width).map(move |i| SourceCell {
                    x: anchor.x + i,
                    y: anchor.y + j,
                })
            })
            .collect()
    }
}
