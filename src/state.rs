use std::collections::BTreeSet;
use std::path::Path;

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, FilterSpec};
use crate::data::loader;
use crate::data::model::{EvalDataset, MetricColumn};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<EvalDataset>,

    /// Current filter query; rebuilt by the sidebar widgets.
    pub filter: FilterSpec,

    /// Indices of records passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Dataset index of the record shown in the comparison view.
    pub selected_row: Option<usize>,

    /// Which metric column the distribution histogram shows.
    pub histogram_metric: MetricColumn,

    /// Colours for flag values, rebuilt per dataset.
    pub flag_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filter: FilterSpec::default(),
            visible_indices: Vec::new(),
            selected_row: None,
            histogram_metric: MetricColumn::StsScore,
            flag_colors: ColorMap::new(Vec::<String>::new()),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: initialise the identity filter, show
    /// every row, select the first one.
    pub fn set_dataset(&mut self, dataset: EvalDataset) {
        self.filter = FilterSpec::full_range(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.selected_row = self.visible_indices.first().copied();
        self.flag_colors = flag_color_map(&dataset);

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Load a dataset file and ingest it, surfacing failures in the status
    /// bar. Used for both the startup path and File → Open.
    pub fn load_from_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!("Loaded {} evaluation records from {}", dataset.len(), path.display());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute `visible_indices` after a filter change. The selection is
    /// kept if it survives the new filter, otherwise moved to the first
    /// visible row (or cleared when nothing matches).
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filter);
            match self.selected_row {
                Some(idx) if self.visible_indices.contains(&idx) => {}
                _ => self.selected_row = self.visible_indices.first().copied(),
            }
        }
    }
}

/// One colour per distinct flag value across all four flag columns, so a
/// value shared between columns (e.g. "Good") is tinted consistently.
fn flag_color_map(dataset: &EvalDataset) -> ColorMap {
    let mut values: BTreeSet<&str> = BTreeSet::new();
    for record in &dataset.records {
        values.insert(record.flag_sts.as_str());
        values.insert(record.flag_bert.as_str());
        values.insert(record.flag_compression.as_str());
        values.insert(record.flag_nli.as_str());
    }
    ColorMap::new(values.into_iter().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EvalRecord, FLAG_ENTAILED, FLAG_GOOD, FLAG_IDEAL};

    fn record(sts: f64) -> EvalRecord {
        EvalRecord {
            question: "Q".to_string(),
            student_answer: "student".to_string(),
            filtered_answer: "filtered".to_string(),
            sts_score: sts,
            bertscore_f1: 0.5,
            compression_ratio: 0.5,
            edit_distance: 1,
            normalized_edit_distance: 0.1,
            nli_entail: 1.0,
            nli_contradict: 0.0,
            nli_neutral: 0.0,
            flag_sts: FLAG_GOOD.to_string(),
            flag_bert: FLAG_GOOD.to_string(),
            flag_compression: FLAG_IDEAL.to_string(),
            flag_nli: FLAG_ENTAILED.to_string(),
        }
    }

    #[test]
    fn refilter_moves_selection_when_the_row_is_filtered_out() {
        let mut state = AppState::default();
        state.set_dataset(EvalDataset::from_records(vec![
            record(0.2),
            record(0.6),
            record(0.9),
        ]));
        state.selected_row = Some(0);

        state.filter.sts_range = (0.5, 1.0);
        state.refilter();

        assert_eq!(state.visible_indices, vec![1, 2]);
        assert_eq!(state.selected_row, Some(1));
    }

    #[test]
    fn refilter_clears_selection_when_nothing_matches() {
        let mut state = AppState::default();
        state.set_dataset(EvalDataset::from_records(vec![record(0.2)]));

        state.filter.sts_range = (0.9, 1.0);
        state.refilter();

        assert!(state.visible_indices.is_empty());
        assert_eq!(state.selected_row, None);
    }
}
