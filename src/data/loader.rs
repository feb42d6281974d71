//! CSV input and output for analysis frames.

use std::{fs::File, path::Path};

use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::info;

use crate::error::Result;

/// Load a CSV file with a header row, scanning every row for schema inference
/// so a late missing-value sentinel keeps the column as text.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    info!(path = %path.display(), rows = frame.height(), "loaded dataset");
    Ok(frame)
}

/// Write a frame as CSV, creating parent directories as needed.
pub fn write_csv(frame: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(frame)?;
    info!(path = %path.display(), rows = frame.height(), "wrote csv");
    Ok(())
}
