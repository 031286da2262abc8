use std::path::Path;

use eframe::egui;

use crate::error::EditorError;
use crate::model::{ImageHandle, Layout};
use crate::tilesheet::SheetImage;
use crate::tools::{TileSource, ToolKind};

use super::{TileEditorApp, settings};

impl TileEditorApp {
    pub(super) fn report(&mut self, result: Result<(), EditorError>, ok: String) {
        match result {
            Ok(()) => {
                log::info!("{ok}");
                self.status = Some(ok);
            }
            Err(e) => {
                log::warn!("{e}");
                self.status = Some(e.to_string());
            }
        }
    }

    pub(super) fn set_tool(&mut self, kind: ToolKind) {
        self.with_tools(|tools, cx| tools.activate(kind, cx));
    }

    pub(super) fn toggle_grid(&mut self) {
        self.renderer.style.show_grid = !self.renderer.style.show_grid;
        self.settings.show_grid = self.renderer.style.show_grid;
        self.persist_settings();
    }

    pub(super) fn reset_view(&mut self) {
        self.view.reset();
        // re-centre on the next frame
        self.canvas_size = None;
    }

    pub(super) fn set_selection_size(&mut self, width: u32, height: u32) {
        if self.sheet.set_selection_size(width, height) {
            self.settings.selection_width = width;
            self.settings.selection_height = height;
            self.persist_settings();
        }
    }

    fn register_texture(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        image: egui::ColorImage,
    ) -> ImageHandle {
        let handle = ImageHandle(self.next_image);
        self.next_image += 1;
        let texture = ctx.load_texture(name, image, egui::TextureOptions::NEAREST);
        self.textures.insert(handle, texture);
        handle
    }

    /// Decode a tile sheet and make it the picker's image. Tiles already on
    /// the grid keep pointing at the image they were painted from.
    pub(super) fn load_tile_sheet(
        &mut self,
        ctx: &egui::Context,
        path: &str,
    ) -> Result<(), EditorError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            rgba.as_raw(),
        );
        let handle = self.register_texture(ctx, path, color_image);
        self.sheet.attach(SheetImage {
            handle,
            width,
            height,
        });
        Ok(())
    }

    pub(super) fn open_tile_sheet_dialog(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png"])
            .pick_file()
        else {
            return;
        };
        let path_str = path.display().to_string();
        let result = self.load_tile_sheet(ctx, &path_str);
        if result.is_ok() {
            self.settings.tilesheet_path = Some(path_str.clone());
            self.persist_settings();
        }
        self.report(result, format!("Loaded tile sheet {path_str}"));
    }

    /// Commit any lifted selection, then write the grid as JSON.
    pub(super) fn save_layout(&mut self, path: &Path) -> Result<(), EditorError> {
        self.with_tools(|tools, cx| tools.restart(cx));
        let json = serde_json::to_string(&self.grid.to_layout())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Replace the grid with a saved layout painted from the current sheet.
    pub(super) fn load_layout(&mut self, path: &Path) -> Result<(), EditorError> {
        let image = self.sheet.image().ok_or(EditorError::NoTileSheet)?;
        let json = std::fs::read_to_string(path)?;
        let layout: Layout = serde_json::from_str(&json)?;
        self.with_tools(|tools, cx| tools.restart(cx));
        self.grid.reload(&layout, image)?;
        self.canvas_size = None;
        self.signals.request_repaint();
        Ok(())
    }

    pub(super) fn quick_save(&mut self) {
        let path = self.settings.layout_path.clone();
        let result = self.save_layout(Path::new(&path));
        self.report(result, format!("Saved {path}"));
    }

    pub(super) fn save_layout_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&self.settings.layout_path)
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let path_str = path.display().to_string();
        let result = self.save_layout(&path);
        if result.is_ok() {
            self.settings.layout_path = path_str.clone();
            self.persist_settings();
        }
        self.report(result, format!("Saved {path_str}"));
    }

    pub(super) fn open_layout_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        let path_str = path.display().to_string();
        let result = self.load_layout(&path);
        if result.is_ok() {
            self.settings.layout_path = path_str.clone();
            self.persist_settings();
        }
        self.report(result, format!("Loaded {path_str}"));
    }

    /// Apply what the tools asked for during this frame.
    pub(super) fn drain_signals(&mut self, ctx: &egui::Context) {
        if let Some(reason) = self.signals.take_advisory() {
            self.status = Some(reason.to_string());
        }
        if let Some(cell) = self.signals.take_picked() {
            if self.sheet.select(cell) {
                self.status = Some(format!("Picked tile {}, {}", cell.x, cell.y));
            }
        }
        if self.signals.take_repaints() > 0 {
            ctx.request_repaint();
        }
    }

    pub(super) fn persist_settings(&mut self) {
        if let Err(e) = settings::save_settings(&self.settings_path, &self.settings) {
            log::warn!("could not save settings to {}: {e}", self.settings_path);
        }
    }
}
