mod app;
mod color;
mod data;
mod state;
mod ui;

use app::EvalBoardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EvalBoard – Filtered Answer Evaluation",
        options,
        Box::new(|_cc| Ok(Box::new(EvalBoardApp::with_startup_data()))),
    )
}
