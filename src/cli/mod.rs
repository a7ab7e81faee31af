pub(crate) mod hotspots;
pub(crate) mod plot;
pub(crate) mod remap;

use clap::Args;
use ddgscope::{
    load_profile, parse_region_option, select_regions, Profile, ProfileFilter, RegionSet,
    Result, TableFormat,
};
use std::path::PathBuf;
use tracing::debug;

/// Table and region selection shared by `plot` and `hotspots`.
#[derive(Args, Debug, Clone)]
pub(crate) struct ProfileArgs {
    /// FoldX-style table with chain, pos, res and dif_energy columns
    pub table: PathBuf,

    /// Table delimiter. Inferred from the file extension if omitted
    #[arg(short = 't', long = "format")]
    pub format: Option<TableFormat>,

    /// Chain ID to plot
    #[arg(short, long, default_value_t = String::from("B"))]
    pub chain: String,

    /// Comma-separated region spec: 'Name1:s-e,Name2:s-e' (overrides auto)
    #[arg(short, long)]
    pub regions: Option<String>,

    /// Number of auto hotspot windows if --regions is not given
    #[arg(short = 'k', long = "auto-zoom", default_value_t = 3)]
    pub auto_zoom: usize,

    /// Window width for auto hotspot selection
    #[arg(short, long, default_value_t = 11)]
    pub window: usize,

    /// [Deprecated] Optional positional cutoff. Prefer --end
    #[arg(long = "max-pos")]
    pub max_pos: Option<i64>,

    /// Global minimum position to include (inclusive)
    #[arg(long)]
    pub start: Option<i64>,

    /// Global maximum position to include (inclusive)
    #[arg(long)]
    pub end: Option<i64>,
}

impl ProfileArgs {
    /// Load the profile and decide which regions to zoom into.
    ///
    /// The region spec is validated before the table is read so that a typo
    /// fails fast.
    pub fn resolve(&self) -> Result<(Profile, RegionSet)> {
        let named = parse_region_option(self.regions.as_deref())?;

        let format = TableFormat::resolve(self.format, &self.table)?;
        let filter = ProfileFilter {
            chain: self.chain.clone(),
            max_pos: self.max_pos,
            start: self.start,
            end: self.end,
        };
        let profile = load_profile(&self.table, format, &filter)?;
        debug!(
            "Loaded {} residues of chain {} spanning {}-{}",
            profile.observations.len(),
            profile.chain,
            profile.pos_min,
            profile.pos_max
        );

        let regions = select_regions(named, &profile, self.auto_zoom, self.window);
        Ok((profile, regions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(table: &std::path::Path, regions: Option<&str>) -> ProfileArgs {
        ProfileArgs {
            table: table.to_path_buf(),
            format: None,
            chain: String::from("B"),
            regions: regions.map(String::from),
            auto_zoom: 1,
            window: 4,
            max_pos: None,
            start: None,
            end: None,
        }
    }

    #[test]
    fn resolve_selects_regions_for_the_loaded_profile() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for row in ["Chain,Pos,Res,dif_energy", "B,10,G,0.5", "B,20,W,-4.0", "B,30,K,1.0"] {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();

        let (profile, regions) = args(file.path(), None).resolve().unwrap();
        assert_eq!((profile.pos_min, profile.pos_max), (10, 30));
        assert_eq!(regions.get("Region1"), Some(&ddgscope::Window::new(18, 22)));

        let (_, regions) = args(file.path(), Some("")).resolve().unwrap();
        assert_eq!(regions.get("Region1"), Some(&ddgscope::Window::new(18, 22)));

        let (_, regions) = args(file.path(), Some("Core:25-12")).resolve().unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions.get("Core"), Some(&ddgscope::Window::new(12, 25)));

        let (_, regions) = args(file.path(), Some(",")).resolve().unwrap();
        assert_eq!(regions.get("Region1"), Some(&ddgscope::Window::new(10, 30)));
    }

    #[test]
    fn resolve_rejects_bad_regions_before_reading() {
        let missing = std::path::Path::new("does/not/exist.tsv");
        assert!(matches!(
            args(missing, Some("Bad")).resolve(),
            Err(ddgscope::DdgError::InvalidRegion(token)) if token == "Bad"
        ));
    }
}
