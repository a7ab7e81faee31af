use clap::Parser;
use ddgscope::{
    load_structure, read_table, remap_table, remapped_path, write_table, ResidueMap, Result,
    TableFormat,
};
use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Map renumbered residues to original PDB numbering (including insertion codes)"
)]
pub(crate) struct Args {
    /// Input CSV/TSV table with 'Chain', 'Pos', and 'Res' columns
    table: PathBuf,

    /// Path to the PDB or mmCIF file the table was computed on
    structure: PathBuf,

    /// Table delimiter. Inferred from the file extension if omitted
    #[arg(short = 't', long = "format")]
    format: Option<TableFormat>,

    /// Prefix the output file name with the structure file name
    #[arg(short, long = "prefix-structure", default_value_t = false)]
    prefix_structure: bool,

    /// Output directory. Defaults to the directory of the input table
    #[arg(short, long = "output-dir")]
    output_dir: Option<PathBuf>,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let format = TableFormat::resolve(args.format, &args.table)?;
    let df = read_table(&args.table, format)?;

    let (pdb, pdb_warnings) = load_structure(&args.structure)?;
    for e in &pdb_warnings {
        match e.level() {
            pdbtbx::ErrorLevel::BreakingError => error!("{e}"),
            pdbtbx::ErrorLevel::InvalidatingError => error!("{e}"),
            _ => warn!("{e}"),
        }
    }

    let residue_map = ResidueMap::from_pdb(&pdb);
    for chain in residue_map.chain_ids() {
        debug!("Chain {chain}: {} residues", residue_map.chain_len(chain));
    }

    let mut df = remap_table(df, &residue_map)?;
    let unmapped = df.column("orn")?.null_count();
    if unmapped > 0 {
        warn!(
            "{unmapped} of {} {} could not be mapped to the structure",
            df.height(),
            match df.height() {
                1 => "row",
                _ => "rows",
            }
        );
    }
    debug!("{}", df.head(Some(10)));

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    let structure = args.prefix_structure.then_some(args.structure.as_path());
    let output_file = remapped_path(&args.table, structure, args.output_dir.as_deref());

    write_table(&mut df, &output_file, format)?;
    info!("Updated table saved as: {}", output_file.display());
    Ok(())
}
