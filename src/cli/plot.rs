use super::ProfileArgs;
use clap::Parser;
use ddgscope::{default_figure_path, render_profile, PlotConfig, Result};
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Plot a ΔΔG profile with one zoom panel per region",
    long_about = "Plot a ΔΔG profile with one zoom panel per region.\n\n\
        Row 1 shows the full profile with the zoom windows shaded. Every region, \
        either given with --regions or picked around the largest |ΔΔG| values, \
        gets its own labeled zoom row. All zoom rows share the same y-axis limits."
)]
pub(crate) struct Args {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Title prefix shown in the panel tags
    #[arg(long, default_value_t = String::from("Target"))]
    title: String,

    /// Output SVG file. Defaults to <table stem>_<chain>.svg next to the table
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Font size in points
    #[arg(long = "font-size", default_value_t = 14)]
    font_size: u32,

    /// Pixels per inch of the figure
    #[arg(long, default_value_t = 100)]
    dpi: u32,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let (profile, regions) = args.profile.resolve()?;
    for (name, window) in regions.iter() {
        debug!("{name}: {window}");
    }

    let config = PlotConfig {
        font_size: args.font_size,
        dpi: args.dpi,
        ..Default::default()
    };
    let output_file = match &args.out {
        Some(out) => out.clone(),
        None => default_figure_path(&args.profile.table, &profile.chain),
    };

    let output_file = render_profile(&output_file, &profile, &regions, &args.title, &config)?;
    info!("Saved figure to {}", output_file.display());
    Ok(())
}
