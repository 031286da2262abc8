mod app;
mod error;
mod grid;
mod model;
mod render;
mod tilesheet;
mod tools;
mod view;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Tile editor",
        native_options,
        Box::new(|cc| Ok(Box::new(app::TileEditorApp::new(cc)))),
    )
}
