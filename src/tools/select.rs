use eframe::egui;

use super::{InputEvent, Tool, ToolContext, ToolKind};
use crate::grid::TileGrid;
use crate::model::{CellPos, Tile};
use crate::render::{Surface, stroke_dashed_rect};
use crate::view::ViewTransform;

const OUTLINE_COLOR: egui::Color32 = egui::Color32::RED;
const OUTLINE_WIDTH: f32 = 2.0;
const OUTLINE_DASH: f32 = 5.0;

/// An occupied cell inside a completed marquee.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectedTile {
    pub original: egui::Pos2,
    pub tile: Tile,
}

/// A tile lifted out of the grid while its selection is being moved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapturedTile {
    pub cell: CellPos,
    pub tile: Tile,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Phase {
    #[default]
    Idle,
    Marquee,
    Dragging {
        offset: egui::Vec2,
    },
}

/// Rectangular marquee selection that can be dragged to move its tiles.
///
/// The first drag of a selection lifts the tiles out of the grid; they only
/// go back when the selection is committed (new marquee, or tool disabled).
#[derive(Debug)]
pub struct SelectionTool {
    phase: Phase,
    anchor: egui::Pos2,
    rect: egui::Rect,
    original: egui::Rect,
    selected: Vec<SelectedTile>,
    captured: Vec<CapturedTile>,
    first_drag: bool,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            anchor: egui::Pos2::ZERO,
            rect: egui::Rect::NOTHING,
            original: egui::Rect::NOTHING,
            selected: Vec::new(),
            captured: Vec::new(),
            first_drag: true,
        }
    }
}

fn snap_floor(p: egui::Pos2, cell_size: u32) -> egui::Pos2 {
    CellPos::containing(p, cell_size).origin(cell_size)
}

fn snap_round(p: egui::Pos2, cell_size: u32) -> egui::Pos2 {
    let size = cell_size as f32;
    egui::pos2((p.x / size).round() * size, (p.y / size).round() * size)
}

/// Cells whose top-left corner lies in `rect`'s cell span.
fn cells_under(rect: egui::Rect, cell_size: u32) -> impl Iterator<Item = CellPos> {
    let start = CellPos::containing(rect.min, cell_size);
    let size = cell_size as f32;
    let cols = (rect.width() / size).floor() as i32;
    let rows = (rect.height() / size).floor() as i32;
    (start.row..start.row + rows)
        .flat_map(move |r| (start.col..start.col + cols).map(move |c| CellPos::new(c, r)))
}

impl SelectionTool {
    pub fn selection(&self) -> Option<egui::Rect> {
        (self.phase == Phase::Marquee || !self.selected.is_empty()).then_some(self.rect)
    }

    fn contains(&self, p: egui::Pos2) -> bool {
        !self.selected.is_empty()
            && p.x >= self.rect.min.x
            && p.x <= self.rect.max.x
            && p.y >= self.rect.min.y
            && p.y <= self.rect.max.y
    }

    fn clear_selection(&mut self) {
        self.phase = Phase::Idle;
        self.rect = egui::Rect::NOTHING;
        self.original = egui::Rect::NOTHING;
        self.selected.clear();
        self.first_drag = true;
    }

    /// Write lifted tiles back at the selection's snapped position.
    fn commit(&mut self, cx: &mut ToolContext<'_>) {
        if self.captured.is_empty() {
            return;
        }
        let size = cx.grid.cell_size();
        let snapped = snap_round(self.rect.min, size);
        let mut dropped = 0;
        for captured in self.captured.drain(..) {
            let relative = captured.cell.origin(size) - self.original.min;
            let dest = CellPos::containing(snapped + relative, size);
            if !cx.grid.set(dest, captured.tile) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::debug!("selection commit dropped {dropped} tiles outside the grid");
        }
        cx.signals.request_repaint();
    }

    fn lift(&mut self, cx: &mut ToolContext<'_>) {
        let size = cx.grid.cell_size();
        self.captured = cells_under(self.original, size)
            .filter_map(|cell| cx.grid.take(cell).map(|tile| CapturedTile { cell, tile }))
            .collect();
        self.first_drag = false;
    }

    fn pointer_down(&mut self, p: egui::Pos2, cx: &mut ToolContext<'_>) {
        if self.contains(p) {
            self.phase = Phase::Dragging {
                offset: p - self.rect.min,
            };
            if self.first_drag {
                self.lift(cx);
                cx.signals.request_repaint();
            }
            return;
        }

        self.commit(cx);
        self.clear_selection();
        let size = cx.grid.cell_size();
        self.anchor = snap_floor(p, size);
        self.rect = egui::Rect::from_min_size(self.anchor, egui::Vec2::splat(size as f32));
        self.original = self.rect;
        self.phase = Phase::Marquee;
        cx.signals.request_repaint();
    }

    fn pointer_move(&mut self, p: egui::Pos2, cx: &mut ToolContext<'_>) {
        let size = cx.grid.cell_size();
        match self.phase {
            Phase::Marquee => {
                let end = snap_floor(p, size);
                let min = self.anchor.min(end);
                let span = (self.anchor - end).abs() + egui::Vec2::splat(size as f32);
                self.rect = egui::Rect::from_min_size(min, span);
            }
            Phase::Dragging { offset } => {
                self.rect = egui::Rect::from_min_size(p - offset, self.rect.size());
            }
            Phase::Idle => return,
        }
        cx.signals.request_repaint();
    }

    fn pointer_up(&mut self, cx: &mut ToolContext<'_>) {
        let size = cx.grid.cell_size();
        match self.phase {
            Phase::Marquee => {
                if self.rect.width() > 0.0 && self.rect.height() > 0.0 {
                    self.selected = cells_under(self.rect, size)
                        .filter_map(|cell| {
                            cx.grid.get(cell).map(|tile| SelectedTile {
                                original: cell.origin(size),
                                tile,
                            })
                        })
                        .collect();
                    self.original = self.rect;
                    log::debug!("selected {} tiles in {:?}", self.selected.len(), self.rect);
                } else {
                    self.clear_selection();
                }
            }
            Phase::Dragging { .. } => {
                let min = snap_round(self.rect.min, size);
                self.rect = egui::Rect::from_min_size(min, self.original.size());
            }
            Phase::Idle => return,
        }
        self.phase = Phase::Idle;
        cx.signals.request_repaint();
    }
}

impl Tool for SelectionTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn enable(&mut self, cx: &mut ToolContext<'_>) {
        self.clear_selection();
        cx.signals.request_repaint();
    }

    fn disable(&mut self, cx: &mut ToolContext<'_>) {
        self.commit(cx);
        self.clear_selection();
        cx.signals.request_repaint();
    }

    fn handle(&mut self, event: &InputEvent, cx: &mut ToolContext<'_>) {
        let p = cx.grid_point(event.pos());
        match event {
            InputEvent::PointerDown { .. } => self.pointer_down(p, cx),
            InputEvent::PointerMove { .. } => self.pointer_move(p, cx),
            InputEvent::PointerUp { .. } => self.pointer_up(cx),
        }
    }

    fn draw_overlay(&self, surface: &mut dyn Surface, view: &ViewTransform, grid: &TileGrid) {
        if let Some(rect) = self.selection() {
            let width = OUTLINE_WIDTH / view.scale();
            let dash = OUTLINE_DASH / view.scale();
            stroke_dashed_rect(surface, rect, width, OUTLINE_COLOR, dash);
        }
        let size = grid.cell_size();
        for captured in &self.captured {
            let relative = captured.cell.origin(size) - self.original.min;
            let dest =
                egui::Rect::from_min_size(self.rect.min + relative, egui::Vec2::splat(size as f32));
            surface.blit(captured.tile.image, captured.tile.source_rect(size), dest);
        }
    }
}
