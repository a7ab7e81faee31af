#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

//! # ddgscope Library
//!
//! Utilities for mutation-energy workflows: loading per-residue ΔΔG tables,
//! picking hotspot windows, rendering zoomed profile figures, and mapping
//! sequentially renumbered residues back to the numbering of the source
//! structure.
//!
//! Tables are handled as Polars DataFrames and structures are read with
//! pdbtbx.

mod error;
mod profile;
mod regions;
mod remap;
mod render;
mod residues;
mod utils;

// Re-export key public types
pub use error::{DdgError, Result};
pub use profile::{
    energy_range, load_profile, profile_from_df, Observation, Profile, ProfileFilter,
    PROFILE_COLUMNS,
};
pub use regions::{
    auto_hotspot_windows, parse_region_option, parse_regions, select_regions, RegionSet, Window,
};
pub use remap::{remap_table, remapped_path, ORN_COLUMN, REMAP_COLUMNS};
pub use render::{default_figure_path, render_profile, svg_output_path, PlotConfig};
pub use residues::{load_structure, ResidueExt, ResidueMap};
pub use utils::{lowercase_columns, read_table, require_columns, write_table, TableFormat};
