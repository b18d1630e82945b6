use super::model::{EvalDataset, EvalRecord, FLAG_ENTAILED, FLAG_GOOD, FLAG_IDEAL};

// ---------------------------------------------------------------------------
// FilterSpec – the current query over the dataset
// ---------------------------------------------------------------------------

/// A complete filter query: three closed numeric ranges and four
/// independent flag toggles. Rebuilt by the UI on every interaction and
/// passed in as a plain value; carries no reference to the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Closed `[min, max]` range over `STS_score`.
    pub sts_range: (f64, f64),
    /// Closed `[min, max]` range over `BERTScore_F1`.
    pub bert_range: (f64, f64),
    /// Closed `[min, max]` range over `Edit_Distance`.
    pub edit_range: (u32, u32),
    /// Keep only rows with `Flag_STS == "Good"`.
    pub only_good_sts: bool,
    /// Keep only rows with `Flag_BERT == "Good"`.
    pub only_good_bert: bool,
    /// Keep only rows with `Flag_Compression == "Ideal"`.
    pub only_ideal_compression: bool,
    /// Keep only rows with `Flag_NLI == "Entailed"`.
    pub only_entailed_nli: bool,
}

impl Default for FilterSpec {
    /// Placeholder used before any dataset is loaded. Equivalent to
    /// `full_range` over an empty dataset.
    fn default() -> Self {
        FilterSpec {
            sts_range: (0.0, 1.0),
            bert_range: (0.0, 1.0),
            edit_range: (0, 0),
            only_good_sts: false,
            only_good_bert: false,
            only_ideal_compression: false,
            only_entailed_nli: false,
        }
    }
}

impl FilterSpec {
    /// The identity filter for `dataset`: score ranges span `[0, 1]`, the
    /// edit range spans up to the dataset's observed maximum, and no flag
    /// toggle is active. Applying it returns every row.
    pub fn full_range(dataset: &EvalDataset) -> Self {
        FilterSpec {
            sts_range: (0.0, 1.0),
            bert_range: (0.0, 1.0),
            edit_range: (0, dataset.max_edit_distance()),
            only_good_sts: false,
            only_good_bert: false,
            only_ideal_compression: false,
            only_entailed_nli: false,
        }
    }

    /// Whether a single record passes every active predicate. Ranges are
    /// inclusive at both ends; disabled toggles impose no constraint.
    pub fn matches(&self, record: &EvalRecord) -> bool {
        let (sts_min, sts_max) = self.sts_range;
        let (bert_min, bert_max) = self.bert_range;
        let (edit_min, edit_max) = self.edit_range;

        if record.sts_score < sts_min || record.sts_score > sts_max {
            return false;
        }
        if record.bertscore_f1 < bert_min || record.bertscore_f1 > bert_max {
            return false;
        }
        if record.edit_distance < edit_min || record.edit_distance > edit_max {
            return false;
        }
        if self.only_good_sts && record.flag_sts != FLAG_GOOD {
            return false;
        }
        if self.only_good_bert && record.flag_bert != FLAG_GOOD {
            return false;
        }
        if self.only_ideal_compression && record.flag_compression != FLAG_IDEAL {
            return false;
        }
        if self.only_entailed_nli && record.flag_nli != FLAG_ENTAILED {
            return false;
        }
        true
    }
}

/// Return indices of records that pass the spec, in source order.
///
/// The result is always a subset of `0..dataset.len()`; an empty result is
/// valid and distinct from a load failure. Recomputed from the full dataset
/// on every call, so the output depends only on `(dataset, spec)`.
pub fn filtered_indices(dataset: &EvalDataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| spec.matches(record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sts: f64, bert: f64, edit: u32, flag_nli: &str) -> EvalRecord {
        EvalRecord {
            question: "Q".to_string(),
            student_answer: "student".to_string(),
            filtered_answer: "filtered".to_string(),
            sts_score: sts,
            bertscore_f1: bert,
            compression_ratio: 0.5,
            edit_distance: edit,
            normalized_edit_distance: 0.1,
            nli_entail: 1.0,
            nli_contradict: 0.0,
            nli_neutral: 0.0,
            flag_sts: FLAG_GOOD.to_string(),
            flag_bert: FLAG_GOOD.to_string(),
            flag_compression: FLAG_IDEAL.to_string(),
            flag_nli: flag_nli.to_string(),
        }
    }

    fn sample_dataset() -> EvalDataset {
        EvalDataset::from_records(vec![
            record(0.2, 0.9, 0, FLAG_ENTAILED),
            record(0.6, 0.4, 4, "Neutral"),
            record(0.9, 0.8, 9, FLAG_ENTAILED),
            record(0.5, 0.5, 12, "Contradicted"),
            record(0.7, 0.6, 2, "Neutral"),
        ])
    }

    #[test]
    fn full_range_returns_every_row_in_order() {
        let ds = sample_dataset();
        let spec = FilterSpec::full_range(&ds);
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn full_range_derives_edit_bound_from_dataset() {
        let ds = sample_dataset();
        let spec = FilterSpec::full_range(&ds);
        assert_eq!(spec.edit_range, (0, 12));
    }

    #[test]
    fn sts_range_keeps_rows_within_closed_bounds() {
        let ds = EvalDataset::from_records(vec![
            record(0.2, 0.5, 1, FLAG_ENTAILED),
            record(0.6, 0.5, 1, FLAG_ENTAILED),
            record(0.9, 0.5, 1, FLAG_ENTAILED),
        ]);
        let mut spec = FilterSpec::full_range(&ds);
        spec.sts_range = (0.5, 1.0);
        assert_eq!(filtered_indices(&ds, &spec), vec![1, 2]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = EvalDataset::from_records(vec![
            record(0.5, 0.5, 3, FLAG_ENTAILED),
            record(0.8, 0.5, 7, FLAG_ENTAILED),
        ]);
        let mut spec = FilterSpec::full_range(&ds);
        spec.sts_range = (0.5, 0.8);
        spec.edit_range = (3, 7);
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 1]);
    }

    #[test]
    fn nli_toggle_restricts_to_entailed_rows() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::full_range(&ds);
        spec.only_entailed_nli = true;
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 2]);
    }

    #[test]
    fn result_is_always_a_subset_of_the_dataset() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::full_range(&ds);
        spec.sts_range = (0.4, 0.8);
        spec.only_entailed_nli = true;
        let indices = filtered_indices(&ds, &spec);
        assert!(indices.iter().all(|&i| i < ds.len()));
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn each_added_constraint_narrows_monotonically() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::full_range(&ds);
        let unconstrained = filtered_indices(&ds, &spec).len();

        spec.bert_range = (0.5, 1.0);
        let after_bert = filtered_indices(&ds, &spec).len();
        assert!(after_bert <= unconstrained);

        spec.only_good_sts = true;
        let after_flag = filtered_indices(&ds, &spec).len();
        assert!(after_flag <= after_bert);
    }

    #[test]
    fn same_spec_applied_twice_is_idempotent() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::full_range(&ds);
        spec.bert_range = (0.5, 0.9);
        spec.edit_range = (0, 9);
        assert_eq!(filtered_indices(&ds, &spec), filtered_indices(&ds, &spec));
    }

    #[test]
    fn empty_result_is_valid_and_not_an_error() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::full_range(&ds);
        spec.sts_range = (0.95, 0.99);
        assert!(filtered_indices(&ds, &spec).is_empty());
    }
}
