use crate::error::{DdgError, Result};
use polars::prelude::*;
use std::path::Path;

/// Read a delimited table, keeping every column as text.
///
/// Column names are lowercased so that `Chain`, `CHAIN` and `chain` are
/// treated alike.
pub fn read_table(path: &Path, format: TableFormat) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(format.separator()))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    lowercase_columns(&mut df)?;
    Ok(df)
}

/// Write a DataFrame as a delimited table with a header row. Nulls are written as empty fields.
pub fn write_table(df: &mut DataFrame, path: &Path, format: TableFormat) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(format.separator())
        .finish(df)?;
    Ok(())
}

/// Lowercase every column name in place.
pub fn lowercase_columns(df: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|c| c.to_lowercase())
        .collect();
    df.set_column_names(names)?;
    Ok(())
}

/// Fail with [`DdgError::MissingColumns`] unless all `required` columns exist.
pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let found: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|c| c.to_string())
        .collect();
    if required.iter().all(|r| found.iter().any(|c| c == r)) {
        return Ok(());
    }
    Err(DdgError::MissingColumns {
        required: required.iter().map(|r| r.to_string()).collect(),
        found,
    })
}

/// Delimiter of an input or output table.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
}

impl TableFormat {
    /// Field separator byte.
    pub fn separator(&self) -> u8 {
        match self {
            TableFormat::Tsv => b'\t',
            TableFormat::Csv => b',',
        }
    }

    /// Infer the format from the file extension (`.tsv`/`.txt` or `.csv`, any case).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("tsv") | Some("txt") => Ok(TableFormat::Tsv),
            Some("csv") => Ok(TableFormat::Csv),
            _ => Err(DdgError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Use the explicit format if given, otherwise infer it from `path`.
    pub fn resolve(explicit: Option<TableFormat>, path: &Path) -> Result<Self> {
        match explicit {
            Some(format) => Ok(format),
            None => Self::from_path(path),
        }
    }
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TableFormat::Tsv => write!(f, "tsv"),
            TableFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn table_format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("a/b/summary.TSV")).unwrap(),
            TableFormat::Tsv
        );
        assert_eq!(
            TableFormat::from_path(Path::new("summary.csv")).unwrap(),
            TableFormat::Csv
        );
        assert!(matches!(
            TableFormat::from_path(Path::new("summary.xlsx")),
            Err(DdgError::UnsupportedFormat(_))
        ));
        assert!(TableFormat::from_path(Path::new("summary")).is_err());

        // An explicit format wins over the extension
        assert_eq!(
            TableFormat::resolve(Some(TableFormat::Csv), Path::new("summary.xlsx")).unwrap(),
            TableFormat::Csv
        );
    }

    #[test]
    fn read_table_lowercases_columns() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Chain,POS,Res").unwrap();
        writeln!(file, "A,1,G").unwrap();
        file.flush().unwrap();

        let df = read_table(file.path(), TableFormat::Csv).unwrap();
        assert_eq!(df.get_column_names_str(), ["chain", "pos", "res"]);
        assert!(require_columns(&df, &["chain", "pos", "res"]).is_ok());

        match require_columns(&df, &["chain", "dif_energy"]) {
            Err(DdgError::MissingColumns { required, found }) => {
                assert_eq!(required, ["chain", "dif_energy"]);
                assert_eq!(found, ["chain", "pos", "res"]);
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }
}
