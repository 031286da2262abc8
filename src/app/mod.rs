use std::collections::{BTreeMap, HashMap};

use eframe::egui;

use crate::grid::TileGrid;
use crate::model::ImageHandle;
use crate::render::{GridRenderer, GridStyle};
use crate::tilesheet::TileSheet;
use crate::tools::{Signals, ToolContext, ToolController, ToolKind};
use crate::view::{DragPan, PinchGesture, ViewTransform};

mod actions;
mod interaction;
mod settings;
mod surface;
mod update;

pub struct TileEditorApp {
    grid: TileGrid,
    view: ViewTransform,
    tools: ToolController,
    sheet: TileSheet,
    textures: HashMap<ImageHandle, egui::TextureHandle>,
    next_image: u32,
    renderer: GridRenderer,
    signals: Signals,
    pinch: PinchGesture,
    drag_pan: DragPan,
    touches: BTreeMap<egui::TouchId, egui::Pos2>,
    canvas_size: Option<egui::Vec2>,
    hover_cell: Option<crate::model::CellPos>,
    settings: settings::AppSettings,
    settings_path: String,
    status: Option<String>,
}

impl TileEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = settings::config_path();
        let settings = settings::load_or_default(&settings_path);
        let mut app = Self::from_settings(settings, settings_path);
        if let Some(path) = app.settings.tilesheet_path.clone() {
            let result = app.load_tile_sheet(&cc.egui_ctx, &path);
            app.report(result, format!("Loaded tile sheet {path}"));
        }
        app
    }

    fn from_settings(settings: settings::AppSettings, settings_path: String) -> Self {
        let mut grid = TileGrid::new(
            settings.canvas_cols,
            settings.canvas_rows,
            settings.tile_size,
        );
        let view = ViewTransform::with_limits(settings.min_scale, settings.max_scale);
        let mut sheet = TileSheet::new(settings.tile_size);
        sheet.set_selection_size(settings.selection_width, settings.selection_height);
        let mut signals = Signals::default();
        let tools = ToolController::new(
            ToolKind::Select,
            &mut ToolContext {
                view: &view,
                grid: &mut grid,
                source: &sheet,
                signals: &mut signals,
            },
        );
        let renderer = GridRenderer::new(GridStyle {
            background: settings.canvas_color.to_color32(),
            line_color: settings.grid_color.to_color32(),
            show_grid: settings.show_grid,
        });

        Self {
            grid,
            view,
            tools,
            sheet,
            textures: HashMap::new(),
            next_image: 1,
            renderer,
            signals,
            pinch: PinchGesture::default(),
            drag_pan: DragPan::default(),
            touches: BTreeMap::new(),
            canvas_size: None,
            hover_cell: None,
            settings,
            settings_path,
            status: None,
        }
    }

    /// Run `f` against the tool controller with a context borrowed from `self`.
    fn with_tools<R>(
        &mut self,
        f: impl FnOnce(&mut ToolController, &mut ToolContext<'_>) -> R,
    ) -> R {
        let mut cx = ToolContext {
            view: &self.view,
            grid: &mut self.grid,
            source: &self.sheet,
            signals: &mut self.signals,
        };
        f(&mut self.tools, &mut cx)
    }
}
