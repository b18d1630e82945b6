use std::collections::BTreeMap;

use super::model::{EvalDataset, MetricColumn};

// ---------------------------------------------------------------------------
// Descriptive statistics for one numeric column
// ---------------------------------------------------------------------------

/// describe()-style summary of a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); 0 for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarize a column. Returns `None` for an empty slice.
pub fn summarize(values: &[f64]) -> Option<ColumnSummary> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(ColumnSummary {
        count,
        mean,
        std,
        min: sorted[0],
        q25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.50),
        q75: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Percentile of a sorted slice with linear interpolation between ranks.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// Extract one metric column of the full dataset as a vector.
pub fn metric_values(dataset: &EvalDataset, metric: MetricColumn) -> Vec<f64> {
    dataset
        .records
        .iter()
        .map(|record| metric.value(record))
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// One equal-width histogram bin over `[start, end)` (the last bin is
/// closed at both ends).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin `values` into `bins` equal-width buckets over the observed range.
/// A single-valued column collapses to one bin; empty input yields none.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical aggregates
// ---------------------------------------------------------------------------

/// Frequency of each distinct value, descending by count. Ties are broken
/// by label so the output is deterministic.
pub fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(v, n)| (v.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Aggregate sums of the three NLI columns over the whole dataset,
/// descending by total.
pub fn nli_totals(dataset: &EvalDataset) -> Vec<(&'static str, f64)> {
    let mut totals = vec![
        ("NLI_entail", 0.0),
        ("NLI_contradict", 0.0),
        ("NLI_neutral", 0.0),
    ];
    for record in &dataset.records {
        totals[0].1 += record.nli_entail;
        totals[1].1 += record.nli_contradict;
        totals[2].1 += record.nli_neutral;
    }
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EvalRecord, FLAG_ENTAILED, FLAG_GOOD, FLAG_IDEAL};

    fn record(nli: (f64, f64, f64)) -> EvalRecord {
        EvalRecord {
            question: "Q".to_string(),
            student_answer: "student".to_string(),
            filtered_answer: "filtered".to_string(),
            sts_score: 0.5,
            bertscore_f1: 0.5,
            compression_ratio: 0.5,
            edit_distance: 1,
            normalized_edit_distance: 0.1,
            nli_entail: nli.0,
            nli_contradict: nli.1,
            nli_neutral: nli.2,
            flag_sts: FLAG_GOOD.to_string(),
            flag_bert: FLAG_GOOD.to_string(),
            flag_compression: FLAG_IDEAL.to_string(),
            flag_nli: FLAG_ENTAILED.to_string(),
        }
    }

    #[test]
    fn summarize_matches_hand_computed_values() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        // sample std of 1..4 = sqrt(5/3)
        assert!((s.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert!((s.q25 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q75 - 3.25).abs() < 1e-12);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn summarize_single_value_has_zero_std() {
        let s = summarize(&[0.7]).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.std, 0.0);
        assert_eq!(s.min, 0.7);
        assert_eq!(s.max, 0.7);
    }

    #[test]
    fn summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn histogram_counts_cover_all_values() {
        let values = [0.0, 0.1, 0.45, 0.5, 0.9, 1.0];
        let bins = histogram(&values, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count + bins[1].count, values.len());
        // 1.0 lands in the last (closed) bin, not past it
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn histogram_of_constant_column_is_one_bin() {
        let bins = histogram(&[0.3, 0.3, 0.3], 30);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn histogram_of_empty_input_is_empty() {
        assert!(histogram(&[], 30).is_empty());
    }

    #[test]
    fn value_counts_sorts_descending_with_stable_ties() {
        let counts = value_counts(["Good", "Poor", "Good", "Fair", "Poor", "Good"]);
        assert_eq!(
            counts,
            vec![
                ("Good".to_string(), 3),
                ("Poor".to_string(), 2),
                ("Fair".to_string(), 1),
            ]
        );
    }

    #[test]
    fn nli_totals_sums_and_sorts_descending() {
        let ds = EvalDataset::from_records(vec![
            record((2.0, 0.0, 1.0)),
            record((3.0, 1.0, 4.0)),
        ]);
        let totals = nli_totals(&ds);
        assert_eq!(totals[0], ("NLI_entail", 5.0));
        assert_eq!(totals[1], ("NLI_neutral", 5.0));
        assert_eq!(totals[2], ("NLI_contradict", 1.0));
    }
}
