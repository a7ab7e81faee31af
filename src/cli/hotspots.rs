use super::ProfileArgs;
use clap::Parser;
use ddgscope::{RegionSet, Result};
use std::io::Write;
use tracing::trace;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Print the zoom regions that `plot` would use")]
pub(crate) struct Args {
    #[command(flatten)]
    profile: ProfileArgs,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let (_, regions) = args.profile.resolve()?;
    write_regions(&mut std::io::stdout().lock(), &regions)?;
    Ok(())
}

/// One `name<TAB>start<TAB>end` line per region.
fn write_regions(out: &mut impl Write, regions: &RegionSet) -> std::io::Result<()> {
    for (name, window) in regions.iter() {
        writeln!(out, "{name}\t{}\t{}", window.start, window.end)?;
    }
    Ok(())
}
