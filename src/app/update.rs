use eframe::egui;

use crate::render::Overlay;
use crate::tools::{ShapeKind, TileSource, ToolKind};

use super::TileEditorApp;
use super::surface::EguiSurface;

const SHORTCUTS: [(egui::Key, ToolKind); 8] = [
    (egui::Key::P, ToolKind::FreeDraw),
    (egui::Key::E, ToolKind::Erase),
    (egui::Key::F, ToolKind::Fill),
    (egui::Key::S, ToolKind::Select),
    (egui::Key::R, ToolKind::Shape(ShapeKind::Rectangle)),
    (egui::Key::O, ToolKind::Shape(ShapeKind::Ellipse)),
    (egui::Key::L, ToolKind::Shape(ShapeKind::Line)),
    (egui::Key::I, ToolKind::Dropper),
];

impl TileEditorApp {
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let mut save = false;
        let mut open = false;
        let mut toggle_grid = false;
        let mut tool = None;
        let wants_keyboard = ctx.wants_keyboard_input();
        ctx.input_mut(|i| {
            save = i.consume_key(egui::Modifiers::COMMAND, egui::Key::S);
            open = i.consume_key(egui::Modifiers::COMMAND, egui::Key::O);
            if wants_keyboard {
                return;
            }
            for (key, kind) in SHORTCUTS {
                if i.consume_key(egui::Modifiers::NONE, key) {
                    tool = Some(kind);
                }
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                tool = Some(ToolKind::Select);
            }
            toggle_grid = i.consume_key(egui::Modifiers::NONE, egui::Key::G);
        });

        if save {
            self.quick_save();
        }
        if open {
            self.open_layout_dialog();
        }
        if let Some(kind) = tool {
            self.set_tool(kind);
        }
        if toggle_grid {
            self.toggle_grid();
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            let active = self.tools.kind();
            for kind in ToolKind::ALL {
                if ui.selectable_label(active == kind, kind.label()).clicked() {
                    self.set_tool(kind);
                }
            }
            ui.separator();
            let mut show_grid = self.renderer.style.show_grid;
            if ui.checkbox(&mut show_grid, "Grid").changed() {
                self.toggle_grid();
            }
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }
            ui.separator();
            if ui.button("Open tile sheet...").clicked() {
                self.open_tile_sheet_dialog(ctx);
            }
            ui.menu_button("Layout", |ui| {
                if ui
                    .add_enabled(self.sheet.is_ready(), egui::Button::new("Open... (⌘O)"))
                    .on_disabled_hover_text("Load a tile sheet first")
                    .clicked()
                {
                    self.open_layout_dialog();
                    ui.close_menu();
                }
                if ui.button("Save as...").clicked() {
                    self.save_layout_dialog();
                    ui.close_menu();
                }
                ui.separator();
                ui.small("Quick save path:");
                if ui
                    .text_edit_singleline(&mut self.settings.layout_path)
                    .lost_focus()
                {
                    self.persist_settings();
                }
                if ui.button("Quick save (⌘S)").clicked() {
                    self.quick_save();
                    ui.close_menu();
                }
            });
        });
    }

    fn tile_picker(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tiles");
        let Some(sheet) = self.sheet.sheet() else {
            ui.label("No tile sheet loaded.");
            return;
        };

        let (mut width, mut height) = self.sheet.selection_size();
        ui.horizontal(|ui| {
            ui.label("Block");
            let w = ui.add(egui::DragValue::new(&mut width).range(1..=32));
            ui.label("×");
            let h = ui.add(egui::DragValue::new(&mut height).range(1..=32));
            if w.changed() || h.changed() {
                self.set_selection_size(width, height);
            }
        });
        ui.add(
            egui::Slider::new(&mut self.settings.picker_zoom, 1.0..=6.0)
                .text("Zoom")
                .step_by(0.5),
        );
        ui.separator();

        let Some(texture) = self.textures.get(&sheet.handle) else {
            return;
        };
        let zoom = self.settings.picker_zoom;
        let size = egui::vec2(sheet.width as f32, sheet.height as f32) * zoom;
        let texture_id = texture.id();
        let mut clicked = None;
        egui::ScrollArea::both().show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
            let rect = response.rect;
            painter.image(
                texture_id,
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            let cell = self.sheet.cell_size() as f32 * zoom;
            let faint = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(40));
            for c in 0..=self.sheet.columns() {
                let x = rect.min.x + c as f32 * cell;
                painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], faint);
            }
            for r in 0..=self.sheet.rows() {
                let y = rect.min.y + r as f32 * cell;
                painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], faint);
            }
            if let Some(selected) = self.sheet.selection_rect() {
                let screen = egui::Rect::from_min_size(
                    rect.min + selected.min.to_vec2() * zoom,
                    selected.size() * zoom,
                );
                painter.rect_stroke(
                    screen,
                    0.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(0x00, 0x7b, 0xff)),
                    egui::StrokeKind::Inside,
                );
            }

            if response.clicked() {
                clicked = response
                    .interact_pointer_pos()
                    .and_then(|p| self.sheet.cell_at(((p - rect.min) / zoom).to_pos2()));
            }
        });

        if let Some(cell) = clicked {
            self.sheet.select(cell);
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.status.as_deref().unwrap_or("Ready"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("Zoom: {:.0}%", self.view.scale() * 100.0));
                ui.separator();
                ui.label(format!("Rotation: {:.0}°", self.view.rotation_degrees()));
                ui.separator();
                if let Some(tile) = self.sheet.anchor() {
                    let (w, h) = self.sheet.selection_size();
                    ui.label(format!("Tile: {}, {} ({w}×{h})", tile.x, tile.y));
                    ui.separator();
                }
                if let Some(cell) = self.hover_cell.filter(|c| self.grid.in_bounds(*c)) {
                    ui.label(format!("Cell: {}, {}", cell.col, cell.row));
                    ui.separator();
                }
                ui.label(format!(
                    "Grid: {}×{} ({} tiles)",
                    self.grid.cols(),
                    self.grid.rows(),
                    self.grid.occupied_count()
                ));
                ui.separator();
                ui.label(self.tools.kind().label());
            });
        });
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        if self.canvas_size != Some(rect.size()) {
            self.view.center_content(rect.size(), self.grid.pixel_size());
            self.canvas_size = Some(rect.size());
        }

        self.handle_canvas_input(ctx, rect, response.hovered());

        let mut surface = EguiSurface::new(
            &painter,
            rect.min,
            ui.visuals().extreme_bg_color,
            &self.textures,
        );
        let overlay: &dyn Overlay = &self.tools;
        self.renderer
            .draw_frame(&mut surface, &self.view, &self.grid, Some(overlay));
    }
}

impl eframe::App for TileEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.top_bar(ctx, ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::SidePanel::left("tile_picker")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                self.tile_picker(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.canvas(ctx, ui);
            });

        self.drain_signals(ctx);
    }
}
