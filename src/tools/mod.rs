//! Editing tools and the controller that keeps exactly one of them active.

use eframe::egui;
use thiserror::Error;

use crate::grid::TileGrid;
use crate::model::{CellPos, ImageHandle, SourceCell, Tile};
use crate::render::{Overlay, Surface};
use crate::view::ViewTransform;

mod dropper;
mod fill;
mod paint;
mod select;
mod shape;

pub use dropper::DropperTool;
pub use fill::{FillTool, flood_fill};
pub use paint::{EraseTool, FreeDrawTool};
pub use select::SelectionTool;
pub use shape::{ShapeKind, ShapeTool, rasterize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer input in surface-local viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pos: egui::Pos2,
        button: PointerButton,
        touches: u8,
    },
    PointerMove {
        pos: egui::Pos2,
        touches: u8,
    },
    PointerUp {
        pos: egui::Pos2,
        button: PointerButton,
        touches: u8,
    },
}

impl InputEvent {
    pub fn pos(&self) -> egui::Pos2 {
        match *self {
            Self::PointerDown { pos, .. }
            | Self::PointerMove { pos, .. }
            | Self::PointerUp { pos, .. } => pos,
        }
    }

    /// Primary button and at most one finger on the surface.
    fn is_primary(&self) -> bool {
        match *self {
            Self::PointerDown {
                button, touches, ..
            }
            | Self::PointerUp {
                button, touches, ..
            } => button == PointerButton::Primary && touches <= 1,
            Self::PointerMove { touches, .. } => touches <= 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    FreeDraw,
    Erase,
    Fill,
    Shape(ShapeKind),
    Select,
    Dropper,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::FreeDraw,
        ToolKind::Erase,
        ToolKind::Fill,
        ToolKind::Shape(ShapeKind::Line),
        ToolKind::Shape(ShapeKind::Rectangle),
        ToolKind::Shape(ShapeKind::Ellipse),
        ToolKind::Dropper,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::FreeDraw => "Pencil",
            ToolKind::Erase => "Erase",
            ToolKind::Fill => "Fill",
            ToolKind::Shape(ShapeKind::Line) => "Line",
            ToolKind::Shape(ShapeKind::Rectangle) => "Rectangle",
            ToolKind::Shape(ShapeKind::Ellipse) => "Ellipse",
            ToolKind::Select => "Select",
            ToolKind::Dropper => "Dropper",
        }
    }

    pub fn build(self) -> Box<dyn Tool> {
        match self {
            ToolKind::FreeDraw => Box::new(FreeDrawTool::default()),
            ToolKind::Erase => Box::new(EraseTool::default()),
            ToolKind::Fill => Box::new(FillTool),
            ToolKind::Shape(kind) => Box::new(ShapeTool::new(kind)),
            ToolKind::Select => Box::new(SelectionTool::default()),
            ToolKind::Dropper => Box::new(DropperTool),
        }
    }
}

/// Why a tool refused to act. Shown to the user, never fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Declined {
    #[error("load a tile sheet first")]
    SheetNotLoaded,
    #[error("pick a tile from the tile sheet first")]
    NoTileSelected,
}

/// The tile picker as the tools see it.
pub trait TileSource {
    fn image(&self) -> Option<ImageHandle>;
    fn cell_size(&self) -> u32;
    /// Selected source cells in row-major order; empty when nothing is picked.
    fn selected_tiles(&self) -> Vec<SourceCell>;

    fn primary_tile(&self) -> Result<Tile, Declined> {
        let image = self.image().ok_or(Declined::SheetNotLoaded)?;
        let cell = self
            .selected_tiles()
            .first()
            .copied()
            .ok_or(Declined::NoTileSelected)?;
        Ok(Tile::from_source_cell(image, cell, self.cell_size()))
    }
}

/// What tools ask of the host after handling an event.
#[derive(Debug, Default)]
pub struct Signals {
    repaints: usize,
    advisory: Option<Declined>,
    picked: Option<SourceCell>,
}

impl Signals {
    pub fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    pub fn advise(&mut self, reason: Declined) {
        if self.advisory != Some(reason) {
            log::warn!("{reason}");
        }
        self.advisory = Some(reason);
    }

    pub fn pick(&mut self, cell: SourceCell) {
        self.picked = Some(cell);
        self.request_repaint();
    }

    #[cfg(test)]
    pub fn repaint_requested(&self) -> bool {
        self.repaints > 0
    }

    pub fn take_repaints(&mut self) -> usize {
        std::mem::take(&mut self.repaints)
    }

    pub fn take_advisory(&mut self) -> Option<Declined> {
        self.advisory.take()
    }

    pub fn take_picked(&mut self) -> Option<SourceCell> {
        self.picked.take()
    }
}

/// Everything a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub view: &'a ViewTransform,
    pub grid: &'a mut TileGrid,
    pub source: &'a dyn TileSource,
    pub signals: &'a mut Signals,
}

impl ToolContext<'_> {
    pub fn cell_at(&self, pos: egui::Pos2) -> CellPos {
        self.view.cell_at(pos, self.grid.cell_size())
    }

    pub fn grid_point(&self, pos: egui::Pos2) -> egui::Pos2 {
        self.view.to_grid(pos)
    }

    /// The tile painting tools lay down, or an advisory when there is none.
    pub fn tile_to_paint(&mut self) -> Option<Tile> {
        match self.source.primary_tile() {
            Ok(tile) => Some(tile),
            Err(reason) => {
                self.signals.advise(reason);
                None
            }
        }
    }

    pub fn draw_at(&mut self, cell: CellPos, tile: Tile) -> bool {
        let landed = self.grid.set(cell, tile);
        if landed {
            self.signals.request_repaint();
        }
        landed
    }

    pub fn erase_at(&mut self, cell: CellPos) -> bool {
        let landed = self.grid.clear(cell);
        if landed {
            self.signals.request_repaint();
        }
        landed
    }
}

pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn enable(&mut self, _cx: &mut ToolContext<'_>) {}

    /// Must leave the grid consistent: anything held by the tool is written back.
    fn disable(&mut self, _cx: &mut ToolContext<'_>) {}

    fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>);

    fn draw_overlay(&self, _surface: &mut dyn Surface, _view: &ViewTransform, _grid: &TileGrid) {}
}

/// Owns the single active tool and pairs every enable with a disable.
pub struct ToolController {
    active: Box<dyn Tool>,
}

impl ToolController {
    pub fn new(kind: ToolKind, cx: &mut ToolContext<'_>) -> Self {
        let mut active = kind.build();
        active.enable(cx);
        Self { active }
    }

    pub fn kind(&self) -> ToolKind {
        self.active.kind()
    }

    pub fn activate(&mut self, kind: ToolKind, cx: &mut ToolContext<'_>) {
        if self.active.kind() == kind {
            return;
        }
        self.activate_tool(kind.build(), cx);
    }

    pub fn activate_tool(&mut self, mut tool: Box<dyn Tool>, cx: &mut ToolContext<'_>) {
        self.active.disable(cx);
        log::info!("tool: {} -> {}", self.active.kind().label(), tool.kind().label());
        tool.enable(cx);
        self.active = tool;
        cx.signals.request_repaint();
    }

    /// Disable and re-enable the active tool, flushing anything it holds.
    pub fn restart(&mut self, cx: &mut ToolContext<'_>) {
        self.active.disable(cx);
        self.active.enable(cx);
        cx.signals.request_repaint();
    }

    pub fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>) {
        if event.is_primary() {
            self.active.handle(event, cx);
        }
    }
}

impl Overlay for ToolController {
    fn draw_overlay(&self, surface: &mut dyn Surface, view: &ViewTransform, grid: &TileGrid) {
        self.active.draw_overlay(surface, view, grid);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Tile source with a fixed selection, 16px cells.
    pub struct FixedSource {
        pub image: Option<ImageHandle>,
        pub tiles: Vec<SourceCell>,
    }

    impl FixedSource {
        pub fn with(tiles: &[(u32, u32)]) -> Self {
            Self {
                image: Some(ImageHandle(1)),
                tiles: tiles.iter().map(|&(x, y)| SourceCell { x, y }).collect(),
            }
        }

        pub fn tile(&self, x: u32, y: u32) -> Tile {
            Tile::from_source_cell(ImageHandle(1), SourceCell { x, y }, 16)
        }
    }

    impl TileSource for FixedSource {
        fn image(&self) -> Option<ImageHandle> {
            self.image
        }

        fn cell_size(&self) -> u32 {
            16
        }

        fn selected_tiles(&self) -> Vec<SourceCell> {
            self.tiles.clone()
        }
    }

    /// A grid, identity view and signal sink that tests drive tools against.
    pub struct Bench {
        pub view: ViewTransform,
        pub grid: TileGrid,
        pub source: FixedSource,
        pub signals: Signals,
    }

    impl Bench {
        pub fn new(cols: u32, rows: u32, source: FixedSource) -> Self {
            Self {
                view: ViewTransform::default(),
                grid: TileGrid::new(cols, rows, 16),
                source,
                signals: Signals::default(),
            }
        }

        pub fn cx(&mut self) -> ToolContext<'_> {
            ToolContext {
                view: &self.view,
                grid: &mut self.grid,
                source: &self.source,
                signals: &mut self.signals,
            }
        }

        pub fn down(&mut self, tool: &mut dyn Tool, x: f32, y: f32) {
            let ev = InputEvent::PointerDown {
                pos: egui::pos2(x, y),
                button: PointerButton::Primary,
                touches: 0,
            };
            tool.handle(&ev, &mut self.cx());
        }

        pub fn drag_to(&mut self, tool: &mut dyn Tool, x: f32, y: f32) {
            let ev = InputEvent::PointerMove {
                pos: egui::pos2(x, y),
                touches: 0,
            };
            tool.handle(&ev, &mut self.cx());
        }

        pub fn up(&mut self, tool: &mut dyn Tool, x: f32, y: f32) {
            let ev = InputEvent::PointerUp {
                pos: egui::pos2(x, y),
                button: PointerButton::Primary,
                touches: 0,
            };
            tool.handle(&ev, &mut self.cx());
        }
    }
}
