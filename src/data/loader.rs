use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{EvalDataset, EvalRecord};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// A failed dataset load. Fatal for that load: surfaced to the caller,
/// never retried, never a partial dataset.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Every column the evaluation table must carry.
pub const REQUIRED_COLUMNS: [&str; 15] = [
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
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an evaluation dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the column names of [`REQUIRED_COLUMNS`]
/// * `.json`    – records-oriented array of objects with the same fields
/// * `.parquet` – flat columns of matching names and types
pub fn load_file(path: &Path) -> Result<EvalDataset, DataSourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataSourceError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader (primary format)
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<EvalDataset, DataSourceError> {
    let mut reader = csv::Reader::from_path(path)?;

    // Check the header before touching any row so a schema problem is
    // reported as the missing column, not as a parse error mid-file.
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DataSourceError::MissingColumn(col.to_string()));
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<EvalRecord>().enumerate() {
        let record = result.map_err(|e| DataSourceError::MalformedRow {
            row: row_no,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(EvalDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "question": "...",
///     "student_answer": "...",
///     "filtered_answer": "...",
///     "STS_score": 0.81,
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<EvalDataset, DataSourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<EvalRecord> = serde_json::from_str(&text)?;
    Ok(EvalDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet rendition of the evaluation table.
///
/// Expected schema: one flat column per [`REQUIRED_COLUMNS`] entry. Utf8
/// for text and flags, Float64/Float32 for continuous metrics, Int64/Int32
/// for `Edit_Distance`. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<EvalDataset, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut row_offset = 0usize;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let column_index = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| DataSourceError::MissingColumn(name.to_string()))
        };

        let question = batch.column(column_index("question")?);
        let student_answer = batch.column(column_index("student_answer")?);
        let filtered_answer = batch.column(column_index("filtered_answer")?);
        let sts_score = batch.column(column_index("STS_score")?);
        let bertscore_f1 = batch.column(column_index("BERTScore_F1")?);
        let compression_ratio = batch.column(column_index("Compression_ratio")?);
        let edit_distance = batch.column(column_index("Edit_Distance")?);
        let normalized_edit = batch.column(column_index("Normalized_Edit_Distance")?);
        let nli_entail = batch.column(column_index("NLI_entail")?);
        let nli_contradict = batch.column(column_index("NLI_contradict")?);
        let nli_neutral = batch.column(column_index("NLI_neutral")?);
        let flag_sts = batch.column(column_index("Flag_STS")?);
        let flag_bert = batch.column(column_index("Flag_BERT")?);
        let flag_compression = batch.column(column_index("Flag_Compression")?);
        let flag_nli = batch.column(column_index("Flag_NLI")?);

        for row in 0..batch.num_rows() {
            let abs_row = row_offset + row;
            records.push(EvalRecord {
                question: string_value(question, row, abs_row, "question")?,
                student_answer: string_value(student_answer, row, abs_row, "student_answer")?,
                filtered_answer: string_value(filtered_answer, row, abs_row, "filtered_answer")?,
                sts_score: f64_value(sts_score, row, abs_row, "STS_score")?,
                bertscore_f1: f64_value(bertscore_f1, row, abs_row, "BERTScore_F1")?,
                compression_ratio: f64_value(compression_ratio, row, abs_row, "Compression_ratio")?,
                edit_distance: u32_value(edit_distance, row, abs_row, "Edit_Distance")?,
                normalized_edit_distance: f64_value(
                    normalized_edit,
                    row,
                    abs_row,
                    "Normalized_Edit_Distance",
                )?,
                nli_entail: f64_value(nli_entail, row, abs_row, "NLI_entail")?,
                nli_contradict: f64_value(nli_contradict, row, abs_row, "NLI_contradict")?,
                nli_neutral: f64_value(nli_neutral, row, abs_row, "NLI_neutral")?,
                flag_sts: string_value(flag_sts, row, abs_row, "Flag_STS")?,
                flag_bert: string_value(flag_bert, row, abs_row, "Flag_BERT")?,
                flag_compression: string_value(flag_compression, row, abs_row, "Flag_Compression")?,
                flag_nli: string_value(flag_nli, row, abs_row, "Flag_NLI")?,
            });
        }

        row_offset += batch.num_rows();
    }

    Ok(EvalDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn malformed(row: usize, col: &str, detail: &str) -> DataSourceError {
    DataSourceError::MalformedRow {
        row,
        message: format!("column '{col}': {detail}"),
    }
}

/// Extract a string cell from a Utf8/LargeUtf8 column.
fn string_value(
    col: &Arc<dyn Array>,
    row: usize,
    abs_row: usize,
    name: &str,
) -> Result<String, DataSourceError> {
    if col.is_null(row) {
        return Err(malformed(abs_row, name, "null value"));
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| malformed(abs_row, name, "expected StringArray"))?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            use arrow::array::AsArray;
            Ok(col.as_string::<i64>().value(row).to_string())
        }
        other => Err(malformed(abs_row, name, &format!("expected Utf8, got {other:?}"))),
    }
}

/// Extract a numeric cell as `f64` (Float64/Float32/Int64/Int32 accepted).
fn f64_value(
    col: &Arc<dyn Array>,
    row: usize,
    abs_row: usize,
    name: &str,
) -> Result<f64, DataSourceError> {
    if col.is_null(row) {
        return Err(malformed(abs_row, name, "null value"));
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(f64::from(arr.value(row)))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(f64::from(arr.value(row)))
        }
        other => Err(malformed(
            abs_row,
            name,
            &format!("expected a numeric type, got {other:?}"),
        )),
    }
}

/// Extract a non-negative integer cell (Int64/Int32 accepted).
fn u32_value(
    col: &Arc<dyn Array>,
    row: usize,
    abs_row: usize,
    name: &str,
) -> Result<u32, DataSourceError> {
    if col.is_null(row) {
        return Err(malformed(abs_row, name, "null value"));
    }
    let raw: i64 = match col.data_type() {
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            arr.value(row)
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            i64::from(arr.value(row))
        }
        other => {
            return Err(malformed(
                abs_row,
                name,
                &format!("expected an integer type, got {other:?}"),
            ));
        }
    };
    u32::try_from(raw).map_err(|_| malformed(abs_row, name, "negative or out-of-range value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_HEADER: &str = "question,student_answer,filtered_answer,STS_score,BERTScore_F1,\
Compression_ratio,Edit_Distance,Normalized_Edit_Distance,NLI_entail,NLI_contradict,NLI_neutral,\
Flag_STS,Flag_BERT,Flag_Compression,Flag_NLI";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("evalboard-{}-{name}", std::process::id()))
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = temp_path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_a_well_formed_csv() {
        let body = format!(
            "{CSV_HEADER}\n\
What is entropy?,Entropy is disorder.,Entropy measures disorder.,0.82,0.91,0.65,12,0.24,3,0,1,Good,Good,Ideal,Entailed\n\
Define energy.,Energy moves things.,Energy is capacity to do work.,0.41,0.55,1.2,37,0.61,1,1,2,Poor,Poor,Verbose,Neutral\n"
        );
        let path = write_temp("ok.csv", &body);

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].question, "What is entropy?");
        assert_eq!(ds.records[0].edit_distance, 12);
        assert_eq!(ds.records[1].flag_nli, "Neutral");
        assert_eq!(ds.max_edit_distance(), 37);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let header_without_sts = CSV_HEADER.replace("STS_score,", "");
        let path = write_temp("missing.csv", &format!("{header_without_sts}\n"));

        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        match err {
            DataSourceError::MissingColumn(col) => assert_eq!(col, "STS_score"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn malformed_value_is_reported_with_its_row() {
        let body = format!(
            "{CSV_HEADER}\n\
Q1,a,b,0.5,0.5,0.5,3,0.1,1,0,0,Good,Good,Ideal,Entailed\n\
Q2,a,b,not-a-number,0.5,0.5,3,0.1,1,0,0,Good,Good,Ideal,Entailed\n"
        );
        let path = write_temp("malformed.csv", &body);

        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        match err {
            DataSourceError::MalformedRow { row, .. } => assert_eq!(row, 1),
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("dataset.xlsx")).unwrap_err();
        match err {
            DataSourceError::UnsupportedExtension(ext) => assert_eq!(ext, "xlsx"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn loads_a_records_oriented_json_file() {
        let body = r#"[
  {
    "question": "What is entropy?",
    "student_answer": "Entropy is disorder.",
    "filtered_answer": "Entropy measures disorder.",
    "STS_score": 0.82,
    "BERTScore_F1": 0.91,
    "Compression_ratio": 0.65,
    "Edit_Distance": 12,
    "Normalized_Edit_Distance": 0.24,
    "NLI_entail": 3.0,
    "NLI_contradict": 0.0,
    "NLI_neutral": 1.0,
    "Flag_STS": "Good",
    "Flag_BERT": "Good",
    "Flag_Compression": "Ideal",
    "Flag_NLI": "Entailed"
  }
]"#;
        let path = write_temp("ok.json", body);

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].flag_compression, "Ideal");
        assert!((ds.records[0].sts_score - 0.82).abs() < 1e-12);
    }
}
