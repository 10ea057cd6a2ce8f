use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, LargeListArray, ListArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Table;

/// Name of the per-patient field in JSON records and the Parquet column.
pub const OBSERVATIONS: &str = "observations";

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: no header, one row per patient, one comma-separated value per
/// day.
///
/// ```text
/// 0,0,1,3,1,2
/// 0,1,2,1,2,1
/// ```
pub fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(day, tok)| {
                tok.trim().parse::<f64>().with_context(|| {
                    format!("CSV row {row_no}, day {day}: '{tok}' is not a number")
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(Table::from_rows(rows)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "observations": [0, 1, 3] },
///   { "observations": [0, 2, 2] }
/// ]
/// ```
///
/// Keys other than `observations` are ignored. Records of different lengths
/// fail this file with [`AnalysisError::RaggedRows`] rather than surfacing
/// later as a shape mismatch between datasets.
///
/// [`AnalysisError::RaggedRows`]: crate::error::AnalysisError::RaggedRows
pub fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Record {i} is not a JSON object"))?;
        rows.push(json_array_to_f64(obj.get(OBSERVATIONS), i)?);
    }

    Ok(Table::from_rows(rows)?)
}

fn json_array_to_f64(val: Option<&JsonValue>, record: usize) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("Record {record}: missing or invalid '{OBSERVATIONS}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("Record {record}, {OBSERVATIONS}[{j}]: not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one row per patient.
///
/// Expected schema:
/// - `observations`: List<Float64> or LargeList<Float64> (Float32 inner
///   values are widened)
/// - Any other columns are ignored
pub fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let idx = batch
            .schema()
            .index_of(OBSERVATIONS)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{OBSERVATIONS}' column"))?;
        let col = batch.column(idx);

        for row in 0..batch.num_rows() {
            let patient = rows.len();
            rows.push(
                extract_f64_list(col, row)
                    .with_context(|| format!("Row {patient}: failed to read '{OBSERVATIONS}'"))?,
            );
        }
    }

    Ok(Table::from_rows(rows)?)
}

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => col
            .as_any()
            .downcast_ref::<ListArray>()
            .context("expected ListArray")?
            .value(row),
        DataType::LargeList(_) => col
            .as_any()
            .downcast_ref::<LargeListArray>()
            .context("expected LargeListArray")?
            .value(row),
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        f64_arr
            .iter()
            .enumerate()
            .map(|(j, v)| v.with_context(|| format!("null value at {OBSERVATIONS}[{j}]")))
            .collect()
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        f32_arr
            .iter()
            .enumerate()
            .map(|(j, v)| {
                v.map(f64::from)
                    .with_context(|| format!("null value at {OBSERVATIONS}[{j}]"))
            })
            .collect()
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Builder, ListBuilder};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::data::writer::write_parquet;
    use crate::error::AnalysisError;

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.csv");
        std::fs::write(&path, "0,1\n1,2\n2,3\n").unwrap();

        let table = load_csv(&path).unwrap();
        assert_eq!(table.n_patients(), 3);
        assert_eq!(table.n_days(), 2);
        assert_eq!(table.row(2), &[2.0, 3.0]);
    }

    #[test]
    fn test_load_csv_rejects_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.csv");
        std::fs::write(&path, "0,1\n1,x\n").unwrap();

        let err = load_csv(&path).unwrap_err();
        assert!(format!("{err:#}").contains("'x' is not a number"));
    }

    #[test]
    fn test_load_csv_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.csv");
        std::fs::write(&path, "0,1,2\n1,2\n").unwrap();

        let err = load_csv(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::RaggedRows {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.json");
        std::fs::write(
            &path,
            r#"[{"observations": [1, 3], "patient": "a"}, {"observations": [2, 4]}]"#,
        )
        .unwrap();

        let table = load_json(&path).unwrap();
        assert_eq!(table.row(0), &[1.0, 3.0]);
        assert_eq!(table.row(1), &[2.0, 4.0]);
    }

    #[test]
    fn test_load_json_missing_observations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.json");
        std::fs::write(&path, r#"[{"observations": [1]}, {"obs": [2]}]"#).unwrap();

        let err = load_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Record 1"));
    }

    #[test]
    fn test_load_json_ragged_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.json");
        std::fs::write(&path, r#"[{"observations": [1, 3]}, {"observations": [2]}]"#).unwrap();

        let err = load_json(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::RaggedRows { row: 1, .. })
        ));
    }

    #[test]
    fn test_load_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.parquet");
        let table = Table::from_rows(vec![vec![0.0, 2.0, 4.0], vec![1.0, 1.0, 1.0]]).unwrap();
        write_parquet(&table, &path).unwrap();

        assert_eq!(load_parquet(&path).unwrap(), table);
    }

    #[test]
    fn test_load_parquet_rejects_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.parquet");

        let mut builder = ListBuilder::new(Float64Builder::new());
        builder.values().append_value(0.0);
        builder.values().append_null();
        builder.append(true);
        builder.values().append_slice(&[1.0, 2.0]);
        builder.append(true);
        let observations = builder.finish();

        let schema = Arc::new(Schema::new(vec![Field::new(
            OBSERVATIONS,
            DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
            false,
        )]));
        let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(observations)]).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_parquet(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Row 0"), "{msg}");
        assert!(msg.contains("null value at observations[1]"), "{msg}");
    }

    #[test]
    fn test_load_parquet_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflammation-01.parquet");
        std::fs::write(&path, b"not parquet").unwrap();

        assert!(load_parquet(&path).is_err());
    }
}
