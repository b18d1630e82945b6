use serde::Deserialize;

// ---------------------------------------------------------------------------
// Flag target values
// ---------------------------------------------------------------------------

/// Target value of `Flag_STS` / `Flag_BERT` when their toggles are active.
pub const FLAG_GOOD: &str = "Good";
/// Target value of `Flag_Compression` when its toggle is active.
pub const FLAG_IDEAL: &str = "Ideal";
/// Target value of `Flag_NLI` when its toggle is active.
pub const FLAG_ENTAILED: &str = "Entailed";

// ---------------------------------------------------------------------------
// EvalRecord – one row of the evaluation table
// ---------------------------------------------------------------------------

/// A single evaluation record: one student answer scored against its
/// filtered counterpart. Serde names mirror the source column headers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvalRecord {
    pub question: String,
    pub student_answer: String,
    pub filtered_answer: String,

    #[serde(rename = "STS_score")]
    pub sts_score: f64,
    #[serde(rename = "BERTScore_F1")]
    pub bertscore_f1: f64,
    #[serde(rename = "Compression_ratio")]
    pub compression_ratio: f64,
    #[serde(rename = "Edit_Distance")]
    pub edit_distance: u32,
    #[serde(rename = "Normalized_Edit_Distance")]
    pub normalized_edit_distance: f64,

    /// Per-row sentence counts for the three NLI classes.
    #[serde(rename = "NLI_entail")]
    pub nli_entail: f64,
    #[serde(rename = "NLI_contradict")]
    pub nli_contradict: f64,
    #[serde(rename = "NLI_neutral")]
    pub nli_neutral: f64,

    #[serde(rename = "Flag_STS")]
    pub flag_sts: String,
    #[serde(rename = "Flag_BERT")]
    pub flag_bert: String,
    #[serde(rename = "Flag_Compression")]
    pub flag_compression: String,
    #[serde(rename = "Flag_NLI")]
    pub flag_nli: String,
}

// ---------------------------------------------------------------------------
// MetricColumn – the numeric columns of the table
// ---------------------------------------------------------------------------

/// One of the eight numeric metric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricColumn {
    StsScore,
    BertscoreF1,
    CompressionRatio,
    EditDistance,
    NormalizedEditDistance,
    NliEntail,
    NliContradict,
    NliNeutral,
}

impl MetricColumn {
    /// Every numeric column, in source order. Drives the summary table.
    pub const ALL: [MetricColumn; 8] = [
        MetricColumn::StsScore,
        MetricColumn::BertscoreF1,
        MetricColumn::CompressionRatio,
        MetricColumn::EditDistance,
        MetricColumn::NormalizedEditDistance,
        MetricColumn::NliEntail,
        MetricColumn::NliContradict,
        MetricColumn::NliNeutral,
    ];

    /// The columns offered in the distribution-histogram selector.
    pub const HISTOGRAM: [MetricColumn; 5] = [
        MetricColumn::StsScore,
        MetricColumn::BertscoreF1,
        MetricColumn::CompressionRatio,
        MetricColumn::EditDistance,
        MetricColumn::NormalizedEditDistance,
    ];

    /// Source column header, used as the display label.
    pub fn label(self) -> &'static str {
        match self {
            MetricColumn::StsScore => "STS_score",
            MetricColumn::BertscoreF1 => "BERTScore_F1",
            MetricColumn::CompressionRatio => "Compression_ratio",
            MetricColumn::EditDistance => "Edit_Distance",
            MetricColumn::NormalizedEditDistance => "Normalized_Edit_Distance",
            MetricColumn::NliEntail => "NLI_entail",
            MetricColumn::NliContradict => "NLI_contradict",
            MetricColumn::NliNeutral => "NLI_neutral",
        }
    }

    /// Read this column's value from a record as `f64`.
    pub fn value(self, record: &EvalRecord) -> f64 {
        match self {
            MetricColumn::StsScore => record.sts_score,
            MetricColumn::BertscoreF1 => record.bertscore_f1,
            MetricColumn::CompressionRatio => record.compression_ratio,
            MetricColumn::EditDistance => f64::from(record.edit_distance),
            MetricColumn::NormalizedEditDistance => record.normalized_edit_distance,
            MetricColumn::NliEntail => record.nli_entail,
            MetricColumn::NliContradict => record.nli_contradict,
            MetricColumn::NliNeutral => record.nli_neutral,
        }
    }
}

// ---------------------------------------------------------------------------
// EvalDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Row order is preserved from the source and the
/// vector index is the row's stable identity for the session. Never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct EvalDataset {
    /// All records (rows).
    pub records: Vec<EvalRecord>,
    /// Largest observed `Edit_Distance`, derived at construction.
    max_edit_distance: u32,
}

impl EvalDataset {
    /// Build the dataset and its derived bounds from loaded records.
    pub fn from_records(records: Vec<EvalRecord>) -> Self {
        let max_edit_distance = records.iter().map(|r| r.edit_distance).max().unwrap_or(0);
        EvalDataset {
            records,
            max_edit_distance,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest observed edit distance (0 for an empty dataset). The default
    /// edit-distance filter range is bounded by this, not by a constant.
    pub fn max_edit_distance(&self) -> u32 {
        self.max_edit_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(edit: u32) -> EvalRecord {
        EvalRecord {
            question: "Q".to_string(),
            student_answer: "student".to_string(),
            filtered_answer: "filtered".to_string(),
            sts_score: 0.5,
            bertscore_f1: 0.5,
            compression_ratio: 0.5,
            edit_distance: edit,
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
    fn max_edit_distance_is_derived_from_records() {
        let ds = EvalDataset::from_records(vec![record(3), record(17), record(5)]);
        assert_eq!(ds.max_edit_distance(), 17);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn empty_dataset_has_zero_edit_bound() {
        let ds = EvalDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.max_edit_distance(), 0);
    }

    #[test]
    fn metric_column_reads_the_matching_field() {
        let mut r = record(7);
        r.sts_score = 0.25;
        r.nli_neutral = 4.0;
        assert_eq!(MetricColumn::StsScore.value(&r), 0.25);
        assert_eq!(MetricColumn::EditDistance.value(&r), 7.0);
        assert_eq!(MetricColumn::NliNeutral.value(&r), 4.0);
    }
}
