use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_range(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One generated evaluation row, kept as plain columns for the writers.
struct Row {
    question: String,
    student_answer: String,
    filtered_answer: String,
    sts_score: f64,
    bertscore_f1: f64,
    compression_ratio: f64,
    edit_distance: i64,
    normalized_edit_distance: f64,
    nli_entail: f64,
    nli_contradict: f64,
    nli_neutral: f64,
    flag_sts: String,
    flag_bert: String,
    flag_compression: String,
    flag_nli: String,
}

const TOPICS: [(&str, &str); 6] = [
    (
        "What is entropy?",
        "Entropy measures the disorder of a thermodynamic system.",
    ),
    (
        "Define photosynthesis.",
        "Photosynthesis converts light energy into chemical energy in plants.",
    ),
    (
        "What causes inflation?",
        "Inflation is a sustained rise in the general price level of goods.",
    ),
    (
        "Explain Newton's first law.",
        "A body stays at rest or in uniform motion unless acted on by a force.",
    ),
    (
        "What is a database index?",
        "An index is a data structure that speeds up lookups on a table column.",
    ),
    (
        "Describe osmosis.",
        "Osmosis is the diffusion of water across a semipermeable membrane.",
    ),
];

const FILLERS: [&str; 4] = [
    "Basically, ",
    "I think that ",
    "As we studied in class, ",
    "To put it simply, ",
];

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    let (question, reference) = TOPICS[rng.next_range(TOPICS.len() as u64) as usize];
    let filler = FILLERS[rng.next_range(FILLERS.len() as u64) as usize];
    let student_answer = format!("{filler}{}", reference.to_lowercase());

    let sts_score = clamp01(rng.gauss(0.72, 0.15));
    let bertscore_f1 = clamp01(sts_score + rng.gauss(0.05, 0.08));
    let compression_ratio = rng.gauss(0.62, 0.22).clamp(0.05, 1.8);
    let edit_distance = rng.gauss(24.0, 14.0).abs().round() as i64;
    let normalized_edit_distance =
        clamp01(edit_distance as f64 / (reference.len() as f64).max(1.0));

    // Sentence counts for the three NLI classes, partitioning the total
    let sentences = 1 + rng.next_range(5);
    let nli_entail = rng.next_range(sentences + 1);
    let nli_contradict = rng.next_range(sentences - nli_entail + 1);
    let nli_neutral = sentences - nli_entail - nli_contradict;

    let flag_sts = if sts_score >= 0.7 { "Good" } else { "Poor" };
    let flag_bert = if bertscore_f1 >= 0.8 { "Good" } else { "Poor" };
    let flag_compression = if (0.4..=0.8).contains(&compression_ratio) {
        "Ideal"
    } else if compression_ratio < 0.4 {
        "Short"
    } else {
        "Verbose"
    };
    let flag_nli = if nli_entail >= nli_contradict && nli_entail >= nli_neutral {
        "Entailed"
    } else if nli_contradict > nli_neutral {
        "Contradicted"
    } else {
        "Neutral"
    };

    Row {
        question: question.to_string(),
        student_answer,
        filtered_answer: reference.to_string(),
        sts_score,
        bertscore_f1,
        compression_ratio,
        edit_distance,
        normalized_edit_distance,
        nli_entail: nli_entail as f64,
        nli_contradict: nli_contradict as f64,
        nli_neutral: nli_neutral as f64,
        flag_sts: flag_sts.to_string(),
        flag_bert: flag_bert.to_string(),
        flag_compression: flag_compression.to_string(),
        flag_nli: flag_nli.to_string(),
    }
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {path}"))?;

    writer.write_record([
        "question",
        "student_answer",
        "filtered_answer",
        "STS_score",
        "BERTScore_F1",
        "Compression_ratio",
        "Edit_Distance",
        "Normalized_Edit_Distance",
        "NLI_entail",
        "NLI_contradict",
        "NLI_neutral",
        "Flag_STS",
        "Flag_BERT",
        "Flag_Compression",
        "Flag_NLI",
    ])?;

    for row in rows {
        writer.write_record([
            row.question.clone(),
            row.student_answer.clone(),
            row.filtered_answer.clone(),
            format!("{:.4}", row.sts_score),
            format!("{:.4}", row.bertscore_f1),
            format!("{:.4}", row.compression_ratio),
            row.edit_distance.to_string(),
            format!("{:.4}", row.normalized_edit_distance),
            format!("{:.1}", row.nli_entail),
            format!("{:.1}", row.nli_contradict),
            format!("{:.1}", row.nli_neutral),
            row.flag_sts.clone(),
            row.flag_bert.clone(),
            row.flag_compression.clone(),
            row.flag_nli.clone(),
        ])?;
    }

    writer.flush().context("flushing CSV writer")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let strings = |f: fn(&Row) -> &str| {
        StringArray::from(rows.iter().map(f).collect::<Vec<_>>())
    };
    let floats = |f: fn(&Row) -> f64| {
        Float64Array::from(rows.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("question", DataType::Utf8, false),
        Field::new("student_answer", DataType::Utf8, false),
        Field::new("filtered_answer", DataType::Utf8, false),
        Field::new("STS_score", DataType::Float64, false),
        Field::new("BERTScore_F1", DataType::Float64, false),
        Field::new("Compression_ratio", DataType::Float64, false),
        Field::new("Edit_Distance", DataType::Int64, false),
        Field::new("Normalized_Edit_Distance", DataType::Float64, false),
        Field::new("NLI_entail", DataType::Float64, false),
        Field::new("NLI_contradict", DataType::Float64, false),
        Field::new("NLI_neutral", DataType::Float64, false),
        Field::new("Flag_STS", DataType::Utf8, false),
        Field::new("Flag_BERT", DataType::Utf8, false),
        Field::new("Flag_Compression", DataType::Utf8, false),
        Field::new("Flag_NLI", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(strings(|r| r.question.as_str())),
            Arc::new(strings(|r| r.student_answer.as_str())),
            Arc::new(strings(|r| r.filtered_answer.as_str())),
            Arc::new(floats(|r| r.sts_score)),
            Arc::new(floats(|r| r.bertscore_f1)),
            Arc::new(floats(|r| r.compression_ratio)),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.edit_distance).collect::<Vec<_>>(),
            )),
            Arc::new(floats(|r| r.normalized_edit_distance)),
            Arc::new(floats(|r| r.nli_entail)),
            Arc::new(floats(|r| r.nli_contradict)),
            Arc::new(floats(|r| r.nli_neutral)),
            Arc::new(strings(|r| r.flag_sts.as_str())),
            Arc::new(strings(|r| r.flag_bert.as_str())),
            Arc::new(strings(|r| r.flag_compression.as_str())),
            Arc::new(strings(|r| r.flag_nli.as_str())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (0..150).map(|_| generate_row(&mut rng)).collect();

    let csv_path = "filtered_evaluation_with_flags.csv";
    let parquet_path = "filtered_evaluation_with_flags.parquet";

    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!("Wrote {} evaluation rows to {csv_path} and {parquet_path}", rows.len());
    Ok(())
}
