use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{EvalDataset, EvalRecord, MetricColumn};
use crate::data::stats;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Row comparison view
// ---------------------------------------------------------------------------

/// Row explorer: pick one matching row and compare the student answer with
/// its filtered counterpart. Shows a warning instead when the current
/// filter matches nothing.
pub fn comparison_view(ui: &mut Ui, state: &mut AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => return,
    };

    if state.visible_indices.is_empty() {
        ui.colored_label(
            Color32::GOLD,
            "No entries match the current filter selection.",
        );
        return;
    }

    let mut selected = match state.selected_row {
        Some(idx) if state.visible_indices.contains(&idx) => idx,
        _ => state.visible_indices[0],
    };

    egui::ComboBox::from_label("Choose a row to view")
        .selected_text(format!("Row {selected}"))
        .show_ui(ui, |ui: &mut Ui| {
            for &idx in &state.visible_indices {
                ui.selectable_value(&mut selected, idx, format!("Row {idx}"));
            }
        });
    state.selected_row = Some(selected);

    let record = &dataset.records[selected];

    ui.add_space(4.0);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong("Question:");
        ui.label(&record.question);
    });
    ui.add_space(4.0);

    ui.columns(2, |columns: &mut [Ui]| {
        columns[0].strong("Student Answer");
        answer_pane(&mut columns[0], "student_answer_pane", &record.student_answer);

        columns[1].strong("Filtered Answer");
        answer_pane(&mut columns[1], "filtered_answer_pane", &record.filtered_answer);
    });
}

fn answer_pane(ui: &mut Ui, id: &str, text: &str) {
    ui.group(|ui: &mut Ui| {
        ScrollArea::vertical()
            .id_salt(id)
            .max_height(180.0)
            .auto_shrink([false, true])
            .show(ui, |ui: &mut Ui| {
                ui.add(egui::Label::new(RichText::new(text).monospace()).wrap());
            });
    });
}

// ---------------------------------------------------------------------------
// Summary statistics table
// ---------------------------------------------------------------------------

const SUMMARY_HEADERS: [&str; 9] = [
    "Metric", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// describe()-style table over every numeric metric column of the full
/// dataset.
pub fn summary_table(ui: &mut Ui, dataset: &EvalDataset) {
    let summaries: Vec<(&str, stats::ColumnSummary)> = MetricColumn::ALL
        .iter()
        .filter_map(|&metric| {
            stats::summarize(&stats::metric_values(dataset, metric))
                .map(|summary| (metric.label(), summary))
        })
        .collect();

    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(180.0))
            .columns(Column::remainder().at_least(56.0), 8)
            .header(20.0, |mut header| {
                for title in SUMMARY_HEADERS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (label, s) in &summaries {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.monospace(*label);
                        });
                        row.col(|ui| {
                            ui.label(s.count.to_string());
                        });
                        for value in [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max] {
                            row.col(|ui| {
                                ui.label(format!("{value:.4}"));
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Flag breakdown tables
// ---------------------------------------------------------------------------

const FLAG_COLUMNS: [(&str, fn(&EvalRecord) -> &str); 4] = [
    ("Flag_STS", |r: &EvalRecord| r.flag_sts.as_str()),
    ("Flag_BERT", |r: &EvalRecord| r.flag_bert.as_str()),
    ("Flag_Compression", |r: &EvalRecord| r.flag_compression.as_str()),
    ("Flag_NLI", |r: &EvalRecord| r.flag_nli.as_str()),
];

/// Per-flag-column value frequencies over the full dataset, values tinted
/// with the dataset's flag palette.
pub fn flag_breakdown(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => return,
    };

    for (label, accessor) in FLAG_COLUMNS {
        let counts = stats::value_counts(dataset.records.iter().map(accessor));

        ui.strong(format!("{label} Distribution"));
        ui.push_id(label, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(140.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Value");
                    });
                    header.col(|ui| {
                        ui.strong("Count");
                    });
                })
                .body(|mut body| {
                    for (value, count) in &counts {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                let color = state.flag_colors.color_for(value);
                                ui.label(RichText::new(value).color(color));
                            });
                            row.col(|ui| {
                                ui.label(count.to_string());
                            });
                        });
                    }
                });
        });
        ui.add_space(8.0);
    }
}
