use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

/// Dataset loaded automatically at startup when present in the working
/// directory.
pub const DEFAULT_DATA_PATH: &str = "filtered_evaluation_with_flags.csv";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EvalBoardApp {
    pub state: AppState,
}

impl Default for EvalBoardApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl EvalBoardApp {
    /// Construct the app and perform the once-per-process startup load. The
    /// dataset handle lives in `AppState` from here on; nothing re-reads the
    /// source behind its back.
    pub fn with_startup_data() -> Self {
        let mut app = EvalBoardApp::default();
        let path = Path::new(DEFAULT_DATA_PATH);
        if path.exists() {
            app.state.load_from_path(path);
        } else {
            log::info!("No dataset at {DEFAULT_DATA_PATH}; open one via File → Open…");
        }
        app
    }
}

impl eframe::App for EvalBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &mut self.state);
        });
    }
}
