use eframe::egui;
use serde::{Deserialize, Serialize};

/// Opaque reference to a source image the host has loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// A `cell_size × cell_size` square of a source image placed into one grid cell.
///
/// Two tiles are the same tile iff image, `source_x` and `source_y` all match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub image: ImageHandle,
    pub source_x: u32,
    pub source_y: u32,
}

impl Tile {
    pub fn from_source_cell(image: ImageHandle, cell: SourceCell, cell_size: u32) -> Self {
        Self {
            image,
            source_x: cell.x * cell_size,
            source_y: cell.y * cell_size,
        }
    }

    pub fn source_cell(&self, cell_size: u32) -> SourceCell {
        let cell_size = cell_size.max(1);
        SourceCell {
            x: self.source_x / cell_size,
            y: self.source_y / cell_size,
        }
    }

    pub fn source_rect(&self, cell_size: u32) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.source_x as f32, self.source_y as f32),
            egui::Vec2::splat(cell_size as f32),
        )
    }
}

/// Integer address of a grid cell. Signed so pointer positions left of or
/// above the grid stay representable (and out of bounds).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub col: i32,
    pub row: i32,
}

impl CellPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Cell containing a point in logical grid space.
    pub fn containing(p: egui::Pos2, cell_size: u32) -> Self {
        let size = cell_size.max(1) as f32;
        Self {
            col: (p.x / size).floor() as i32,
            row: (p.y / size).floor() as i32,
        }
    }

    /// Top-left corner of the cell in logical grid space.
    pub fn origin(self, cell_size: u32) -> egui::Pos2 {
        let size = cell_size as f32;
        egui::pos2(self.col as f32 * size, self.row as f32 * size)
    }

    pub fn rect(self, cell_size: u32) -> egui::Rect {
        egui::Rect::from_min_size(self.origin(cell_size), egui::Vec2::splat(cell_size as f32))
    }
}

/// Cell coordinate inside a source image, as handed out by the tile picker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceCell {
    pub x: u32,
    pub y: u32,
}

/// One occupied cell of a saved layout. The image is re-attached on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTile {
    #[serde(rename = "sourceX", alias = "sx")]
    pub source_x: u32,
    #[serde(rename = "sourceY", alias = "sy")]
    pub source_y: u32,
}

/// Saved grid: rows outer, columns inner.
pub type Layout = Vec<Vec<Option<PersistedTile>>>;

/// Colour stored in settings as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&s).ok_or_else(|| format!("invalid colour {s:?}, expected #rrggbb"))
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        if c.a == 255 {
            format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
    }
}
