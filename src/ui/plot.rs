use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::generate_palette;
use crate::data::model::EvalDataset;
use crate::data::stats;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Metric distribution histogram
// ---------------------------------------------------------------------------

const HISTOGRAM_BINS: usize = 30;

/// Render the distribution histogram of the selected metric over the full
/// dataset.
pub fn metric_histogram(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => return,
    };

    let metric = state.histogram_metric;
    let values = stats::metric_values(dataset, metric);
    let bins = stats::histogram(&values, HISTOGRAM_BINS);

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            let center = (bin.start + bin.end) * 0.5;
            let width = bin.end - bin.start;
            // A constant column collapses to one zero-width bin
            let width = if width <= f64::EPSILON { 1.0 } else { width * 0.95 };
            Bar::new(center, bin.count as f64).width(width)
        })
        .collect();

    let chart = BarChart::new(bars)
        .color(Color32::LIGHT_BLUE)
        .name(metric.label());

    Plot::new("metric_histogram")
        .legend(Legend::default())
        .x_axis_label(metric.label())
        .y_axis_label("Count")
        .height(280.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// NLI label distribution (aggregate over all answers)
// ---------------------------------------------------------------------------

/// Render the bar chart of the three NLI class totals, one legend entry per
/// class.
pub fn nli_bar_chart(ui: &mut Ui, dataset: &EvalDataset) {
    let totals = stats::nli_totals(dataset);
    let palette = generate_palette(totals.len());

    Plot::new("nli_totals")
        .legend(Legend::default())
        .x_axis_label("NLI Class")
        .y_axis_label("Total Sentences")
        .height(240.0)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (label, total)) in totals.iter().enumerate() {
                let bar = Bar::new(i as f64, *total).width(0.6).fill(palette[i]);
                let chart = BarChart::new(vec![bar]).color(palette[i]).name(*label);
                plot_ui.bar_chart(chart);
            }
        });
}
