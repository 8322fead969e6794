//! Tabular helpers shared by the readers: CSV loading, column checks and
//! typed column extraction.

use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use gci_core::{GciError, GciResult};
use polars::prelude::*;

pub(crate) fn polars_err(context: impl std::fmt::Display) -> impl FnOnce(PolarsError) -> GciError {
    move |err| GciError::DataFormat(format!("{context}: {err}"))
}

pub(crate) fn read_csv(path: &Path) -> GciResult<DataFrame> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    if extension != "csv" {
        return Err(GciError::DataFormat(format!(
            "unsupported file extension '{}' for {}; use .csv",
            extension,
            path.display()
        )));
    }
    let file = File::open(path)?;
    CsvReader::new(file)
        .has_header(true)
        .finish()
        .map_err(polars_err(format!("reading {}", path.display())))
}

pub(crate) fn read_csv_bytes(bytes: Vec<u8>, label: &str) -> GciResult<DataFrame> {
    CsvReader::new(Cursor::new(bytes))
        .has_header(true)
        .finish()
        .map_err(polars_err(format!("reading {label}")))
}

/// Fail with a data format error naming the first absent column.
pub(crate) fn require_columns(df: &DataFrame, columns: &[&str], what: &str) -> GciResult<()> {
    let present = df.get_column_names();
    match columns.iter().find(|c| !present.contains(*c)) {
        Some(missing) => Err(GciError::DataFormat(format!(
            "{what} is missing required column '{missing}'"
        ))),
        None => Ok(()),
    }
}

/// Column values as floats; nulls and unparseable cells become `None`.
pub(crate) fn f64_column(df: &DataFrame, name: &str) -> GciResult<Vec<Option<f64>>> {
    let series = df
        .column(name)
        .map_err(polars_err(format!("column '{name}'")))?
        .cast(&DataType::Float64)
        .map_err(polars_err(format!("casting '{name}' to Float64")))?;
    let values = series
        .f64()
        .map_err(polars_err(format!("'{name}' must be numeric")))?;
    Ok(values.into_iter().collect())
}

/// Column values as strings, whatever their inferred type.
pub(crate) fn str_column(df: &DataFrame, name: &str) -> GciResult<Vec<Option<String>>> {
    let series = df
        .column(name)
        .map_err(polars_err(format!("column '{name}'")))?
        .cast(&DataType::Utf8)
        .map_err(polars_err(format!("casting '{name}' to Utf8")))?;
    let values = series
        .utf8()
        .map_err(polars_err(format!("'{name}' must be text")))?;
    Ok(values
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

/// Write `df` as CSV next to `output` under `stage/`, then copy it into
/// place so a failed write never leaves a truncated output behind. The
/// staged file is always removed, and the stage directory once empty.
pub(crate) fn write_csv_staged(df: &mut DataFrame, output: &Path, stage: &str) -> GciResult<()> {
    let staged = staged_output_path(output, stage);
    let stage_dir = staged.parent().map(Path::to_path_buf);
    if let Some(dir) = &stage_dir {
        fs::create_dir_all(dir)?;
    }
    let result = write_and_copy(df, &staged, output);
    let _ = fs::remove_file(&staged);
    if let Some(dir) = &stage_dir {
        // left in place when another writer is still using it
        let _ = fs::remove_dir(dir);
    }
    result
}

fn write_and_copy(df: &mut DataFrame, staged: &Path, output: &Path) -> GciResult<()> {
    let mut file = File::create(staged)?;
    CsvWriter::new(&mut file)
        .finish(df)
        .map_err(polars_err(format!("writing {}", staged.display())))?;
    drop(file);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(staged, output)?;
    Ok(())
}

fn staged_output_path(output: &Path, stage: &str) -> PathBuf {
    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    let file_name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output".into());
    parent.join(stage).join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn require_columns_names_the_missing_one() {
        let df = df!["a" => &[1i64], "b" => &[2i64]].unwrap();
        assert!(require_columns(&df, &["a", "b"], "test frame").is_ok());
        let err = require_columns(&df, &["a", "c"], "test frame").unwrap_err();
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn numeric_and_text_extraction() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "id,v\n7,1.5\n8,\n").unwrap();
        let df = read_csv(&path).unwrap();
        assert_eq!(f64_column(&df, "v").unwrap(), vec![Some(1.5), None]);
        assert_eq!(
            str_column(&df, "id").unwrap(),
            vec![Some("7".to_string()), Some("8".to_string())]
        );
    }

    #[test]
    fn rejects_non_csv_extension() {
        let err = read_csv(Path::new("plants.xlsx")).unwrap_err();
        assert!(matches!(err, GciError::DataFormat(_)));
    }

    #[test]
    fn staged_write_lands_at_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("out.csv");
        let mut df = df!["x" => &[1.0f64, 2.0]].unwrap();
        write_csv_staged(&mut df, &out, "gci-test").unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("x\n"));
        assert!(!dir.path().join("nested/gci-test").exists());
    }

    #[test]
    fn failed_copy_cleans_stage() {
        let dir = tempdir().unwrap();
        // a directory in the output's place makes the final copy fail
        let out = dir.path().join("taken.csv");
        fs::create_dir_all(&out).unwrap();
        let mut df = df!["x" => &[1.0f64]].unwrap();
        assert!(write_csv_staged(&mut df, &out, "gci-test").is_err());
        assert!(!dir.path().join("gci-test").exists());
    }
}
