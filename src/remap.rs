//! Annotating energy tables with original residue numbers.

use crate::error::Result;
use crate::residues::ResidueMap;
use crate::utils::{lowercase_columns, require_columns};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Columns a table needs before it can be remapped.
pub const REMAP_COLUMNS: [&str; 3] = ["chain", "pos", "res"];

/// Name of the column holding the original residue number.
pub const ORN_COLUMN: &str = "orn";

/// Append the `orn` column to `df`.
///
/// Column names are lowercased first. Each row's `(chain, pos)` is looked up
/// in `residue_map`; rows without a mapping, including unparseable positions,
/// get a null.
pub fn remap_table(mut df: DataFrame, residue_map: &ResidueMap) -> Result<DataFrame> {
    lowercase_columns(&mut df)?;
    require_columns(&df, &REMAP_COLUMNS)?;

    let chains = df
        .column("chain")?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let positions = df
        .column("pos")?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    let orn: Vec<Option<String>> = chains
        .str()?
        .into_iter()
        .zip(positions.f64()?.into_iter())
        .map(|(chain, pos)| match (chain, pos) {
            (Some(chain), Some(pos)) if pos.fract() == 0.0 => residue_map
                .original(chain, pos as i64)
                .map(str::to_string),
            _ => None,
        })
        .collect();

    df.with_column(Series::new(ORN_COLUMN.into(), orn))?;
    Ok(df)
}

/// Where the remapped table is written.
///
/// The file is named `<table stem>_with_orn.<ext>`, or
/// `<structure stem>_<table stem>_with_orn.<ext>` when `structure` is given.
/// It lands in `output_dir` if set, otherwise next to the input table.
pub fn remapped_path(table: &Path, structure: Option<&Path>, output_dir: Option<&Path>) -> PathBuf {
    let stem = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let mut file_name = match structure {
        Some(structure) => format!("{}_{}_with_orn", stem(structure), stem(table)),
        None => format!("{}_with_orn", stem(table)),
    };
    if let Some(ext) = table.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => table.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(file_name)
}
