use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::MetricColumn;
use crate::state::AppState;
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Every widget edits the current
/// `FilterSpec` directly; the trailing `refilter` makes the view catch up
/// with whatever changed this frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let max_edit = match &state.dataset {
        Some(ds) => ds.max_edit_distance(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("STS Score Range");
            ui.add(egui::Slider::new(&mut state.filter.sts_range.0, 0.0..=1.0).text("min"));
            ui.add(egui::Slider::new(&mut state.filter.sts_range.1, 0.0..=1.0).text("max"));
            clamp_range(&mut state.filter.sts_range);
            ui.separator();

            ui.strong("BERTScore F1 Range");
            ui.add(egui::Slider::new(&mut state.filter.bert_range.0, 0.0..=1.0).text("min"));
            ui.add(egui::Slider::new(&mut state.filter.bert_range.1, 0.0..=1.0).text("max"));
            clamp_range(&mut state.filter.bert_range);
            ui.separator();

            ui.strong("Edit Distance Range");
            ui.add(egui::Slider::new(&mut state.filter.edit_range.0, 0..=max_edit).text("min"));
            ui.add(egui::Slider::new(&mut state.filter.edit_range.1, 0..=max_edit).text("max"));
            clamp_range(&mut state.filter.edit_range);
            ui.separator();

            ui.strong("Flag Filters");
            ui.checkbox(&mut state.filter.only_good_sts, "Flag_STS = Good");
            ui.checkbox(&mut state.filter.only_good_bert, "Flag_BERT = Good");
            ui.checkbox(
                &mut state.filter.only_ideal_compression,
                "Flag_Compression = Ideal",
            );
            ui.checkbox(&mut state.filter.only_entailed_nli, "Flag_NLI = Entailed");
        });

    // Recompute visible indices after any widget changes.
    state.refilter();
}

/// Keep a `[min, max]` pair ordered after one of its sliders moved.
fn clamp_range<T: PartialOrd + Copy>(range: &mut (T, T)) {
    if range.1 < range.0 {
        range.1 = range.0;
    }
}

// ---------------------------------------------------------------------------
// Central panel – dashboard sections
// ---------------------------------------------------------------------------

/// Render the central dashboard: row explorer, distribution histogram,
/// summary statistics, NLI totals, flag breakdowns.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an evaluation table to explore it  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Explore Student vs. Filtered Answers");
            ui.add_space(4.0);
            tables::comparison_view(ui, state);
            ui.separator();

            ui.heading("Metric Distributions");
            ui.add_space(4.0);
            histogram_selector(ui, state);
            plot::metric_histogram(ui, state);
            ui.separator();

            ui.heading("Summary Statistics");
            ui.add_space(4.0);
            if let Some(ds) = &state.dataset {
                tables::summary_table(ui, ds);
            }
            ui.separator();

            ui.heading("NLI Label Distribution (All Answers Combined)");
            ui.add_space(4.0);
            if let Some(ds) = &state.dataset {
                plot::nli_bar_chart(ui, ds);
            }
            ui.separator();

            ui.heading("Flag Breakdown by Category");
            ui.add_space(4.0);
            tables::flag_breakdown(ui, state);
        });
}

fn histogram_selector(ui: &mut Ui, state: &mut AppState) {
    let current = state.histogram_metric;
    egui::ComboBox::from_label("Choose a metric to view distribution")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in MetricColumn::HISTOGRAM {
                if ui
                    .selectable_label(state.histogram_metric == metric, metric.label())
                    .clicked()
                {
                    state.histogram_metric = metric;
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} matching",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open evaluation table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_from_path(&path);
    }
}
