use eframe::egui;

use crate::error::EditorError;
use crate::model::{CellPos, ImageHandle, Layout, PersistedTile, Tile};

/// Rectangular store of optional tiles, row-major.
///
/// Reads and writes outside `[0, cols) × [0, rows)` are silent no-ops, so
/// callers never bounds-check first. The grid knows nothing about rendering;
/// whoever mutates it raises the repaint request.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
    cell_size: u32,
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    pub fn new(cols: u32, rows: u32, cell_size: u32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cell_size: cell_size.max(1),
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Logical size of the whole grid in pixels.
    pub fn pixel_size(&self) -> egui::Vec2 {
        egui::vec2(
            (self.cols * self.cell_size) as f32,
            (self.rows * self.cell_size) as f32,
        )
    }

    pub fn in_bounds(&self, cell: CellPos) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as u32) < self.cols
            && (cell.row as u32) < self.rows
    }

    fn index(&self, cell: CellPos) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.row as usize * self.cols as usize + cell.col as usize)
    }

    pub fn get(&self, cell: CellPos) -> Option<Tile> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// Returns whether the write landed.
    pub fn set(&mut self, cell: CellPos, tile: Tile) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.cells[i] = Some(tile);
                true
            }
            None => false,
        }
    }

    /// Returns whether the write landed.
    pub fn clear(&mut self, cell: CellPos) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.cells[i] = None;
                true
            }
            None => false,
        }
    }

    /// Clear a cell and hand back what was in it.
    pub fn take(&mut self, cell: CellPos) -> Option<Tile> {
        let i = self.index(cell)?;
        self.cells[i].take()
    }

    /// Occupied cells, rows top-to-bottom then columns left-to-right.
    pub fn occupied(&self) -> impl Iterator<Item = (CellPos, Tile)> + '_ {
        let cols = self.cols as usize;
        self.cells.iter().enumerate().filter_map(move |(i, tile)| {
            tile.map(|t| (CellPos::new((i % cols) as i32, (i / cols) as i32), t))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn to_layout(&self) -> Layout {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.map(|t| PersistedTile {
                            source_x: t.source_x,
                            source_y: t.source_y,
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Rebuild a grid from a saved layout, attaching `image` to every tile.
    ///
    /// Dimensions come from the layout itself: row count, and the first
    /// row's length. Other rows are padded or truncated to that width.
    pub fn from_layout(
        layout: &Layout,
        image: ImageHandle,
        cell_size: u32,
    ) -> Result<Self, EditorError> {
        let cols = layout.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(EditorError::EmptyLayout);
        }
        let rows = layout.len();
        let mut cells = Vec::with_capacity(cols * rows);
        for (r, row) in layout.iter().enumerate() {
            if row.len() != cols {
                log::warn!(
                    "layout row {r} has {} cells, expected {cols}; adjusting",
                    row.len()
                );
            }
            cells.extend(row.iter().take(cols).map(|cell| {
                cell.map(|p| Tile {
                    image,
                    source_x: p.source_x,
                    source_y: p.source_y,
                })
            }));
            cells.extend(std::iter::repeat_n(None, cols.saturating_sub(row.len())));
        }
        Ok(Self {
            cols: cols as u32,
            rows: rows as u32,
            cell_size: cell_size.max(1),
            cells,
        })
    }

    /// Replace the backing store wholesale with a saved layout.
    pub fn reload(&mut self, layout: &Layout, image: ImageHandle) -> Result<(), EditorError> {
        *self = Self::from_layout(layout, image, self.cell_size)?;
        Ok(())
    }
}
