//! Writers mirroring the layouts accepted by [`super::loader`].

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Builder, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::loader::OBSERVATIONS;
use super::model::Table;

#[derive(Serialize)]
struct Record<'a> {
    observations: &'a [f64],
}

/// Write a headerless CSV, one line per patient.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context("creating CSV")?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write a JSON array of `{ "observations": [...] }` records.
pub fn write_json(table: &Table, path: &Path) -> Result<()> {
    let records: Vec<Record<'_>> = table
        .rows()
        .map(|observations| Record { observations })
        .collect();
    let file = File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records).context("writing JSON")?;
    Ok(())
}

/// Write a Parquet file with a single `observations` List<Float64> column.
pub fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in table.rows() {
        builder.values().append_slice(row);
        builder.append(true);
    }
    let observations = builder.finish();

    let schema = Arc::new(Schema::new(vec![Field::new(
        OBSERVATIONS,
        DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
        false,
    )]));
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(observations)])
        .context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
