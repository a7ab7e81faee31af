//! Multi-panel ΔΔG figures.
//!
//! The first panel shows the whole profile with every region shaded. Each
//! region then gets its own zoom panel with residue labels; all zoom panels
//! share the same y-limits so their magnitudes can be compared by eye.
//!
//! Figures are written with the SVG backend, which needs no system fonts.

use crate::error::{DdgError, Result};
use crate::profile::{energy_range, Observation, Profile};
use crate::regions::{RegionSet, Window};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const SHADE_COLOR: RGBColor = RGBColor(128, 128, 128);
const FONT_FAMILY: &str = "sans-serif";

/// Layout settings of a profile figure.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Font size in points
    pub font_size: u32,
    /// Vertical offset of residue labels above their point, in kcal/mol
    pub label_offset: f64,
    /// Minimum figure size (width, height) in inches
    pub figure_size: (f64, f64),
    /// Padding added below and above the shared zoom y-limits, in kcal/mol
    pub pad_y: f64,
    /// Height reserved for the full profile panel, in inches
    pub top_height: f64,
    /// Height added per zoom panel, in inches
    pub zoom_height: f64,
    /// Height of the full profile panel relative to one zoom panel
    pub top_ratio: f64,
    /// Pixels per inch
    pub dpi: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            font_size: 14,
            label_offset: 0.25,
            figure_size: (12.0, 10.0),
            pad_y: 0.3,
            top_height: 3.5,
            zoom_height: 2.3,
            top_ratio: 2.5,
            dpi: 100,
        }
    }
}

impl PlotConfig {
    /// Figure size in inches for `n_regions` zoom panels.
    pub fn figure_inches(&self, n_regions: usize) -> (f64, f64) {
        let height = self
            .figure_size
            .1
            .max(self.top_height + self.zoom_height * n_regions as f64);
        (self.figure_size.0, height)
    }

    /// Figure size in pixels for `n_regions` zoom panels.
    pub fn figure_pixels(&self, n_regions: usize) -> (u32, u32) {
        let (w, h) = self.figure_inches(n_regions);
        let dpi = self.dpi as f64;
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    fn font_px(&self) -> u32 {
        (self.font_size as f64 * self.dpi as f64 / 72.0).round() as u32
    }
}

/// Path the figure is actually written to.
///
/// A missing extension becomes `.svg`; any other extension is replaced by
/// `.svg` with a warning.
pub fn svg_output_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => path.to_path_buf(),
        Some(ext) => {
            warn!("Only SVG output is supported, writing .svg instead of .{ext}");
            path.with_extension("svg")
        }
        None => path.with_extension("svg"),
    }
}

/// Default figure location: `<table stem>_<chain>.svg` next to the table.
pub fn default_figure_path(table: &Path, chain: &str) -> PathBuf {
    let stem = table
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("profile"));
    table.with_file_name(format!("{stem}_{chain}.svg"))
}

/// Render `profile` with one zoom panel per region and return the written path.
pub fn render_profile(
    path: &Path,
    profile: &Profile,
    regions: &RegionSet,
    title: &str,
    config: &PlotConfig,
) -> Result<PathBuf> {
    let output_file = svg_output_path(path);
    let size = config.figure_pixels(regions.len());
    debug!("Drawing {}x{} figure with {} zoom panels", size.0, size.1, regions.len());

    {
        let root = SVGBackend::new(&output_file, size).into_drawing_area();
        draw_figure(&root, profile, regions, title, config)
            .map_err(|e| DdgError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| DdgError::Render(e.to_string()))?;
    }
    Ok(output_file)
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    profile: &Profile,
    regions: &RegionSet,
    title: &str,
    config: &PlotConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let n_zoom = regions.len().max(1);
    let (_, height) = root.dim_in_pixel();
    let top_px = (height as f64 * config.top_ratio / (config.top_ratio + n_zoom as f64)) as u32;
    let (top, rest) = root.split_vertically(top_px);
    let zoom_areas = rest.split_evenly((n_zoom, 1));

    // Full profile
    let all: Vec<&Observation> = profile.observations.iter().collect();
    let (lo, hi) = energy_range(all.iter().copied()).unwrap_or((0.0, 0.0));
    let shaded: Vec<Window> = regions
        .windows()
        .filter_map(|w| w.clamp(profile.pos_min, profile.pos_max))
        .collect();
    draw_panel(
        &top,
        &Panel {
            points: &all,
            x_range: padded_range(profile.pos_min as f64, profile.pos_max as f64),
            y_range: padded_range(lo - config.pad_y, hi + config.pad_y),
            shaded: &shaded,
            labels: false,
            y_desc: "ΔΔG (kcal/mol)",
            tag: format!("PDB: {title}"),
        },
        config,
    )?;

    // Shared y-limits over every zoom slice
    let slices: Vec<Vec<&Observation>> = regions.windows().map(|w| profile.slice(w)).collect();
    let (zlo, zhi) = energy_range(slices.iter().flatten().copied())
        .unwrap_or((lo, hi));
    let zoom_y = padded_range(zlo - config.pad_y, zhi + config.pad_y);

    for ((name, window), (area, points)) in regions.iter().zip(zoom_areas.iter().zip(&slices)) {
        let w = window.clamp(profile.pos_min, profile.pos_max).unwrap_or(*window);
        draw_panel(
            area,
            &Panel {
                points,
                x_range: padded_range(w.start as f64, w.end as f64),
                y_range: zoom_y.clone(),
                shaded: &[],
                labels: true,
                y_desc: "ΔΔG (kcal/mol)",
                tag: format!("PDB: {title} {name}"),
            },
            config,
        )?;
    }

    Ok(())
}

struct Panel<'a> {
    points: &'a [&'a Observation],
    x_range: Range<f64>,
    y_range: Range<f64>,
    shaded: &'a [Window],
    labels: bool,
    y_desc: &'a str,
    tag: String,
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    config: &PlotConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let font_px = config.font_px();
    let (width, height) = area.dim_in_pixel();
    let tag_width = font_px * 2;
    let (plot_area, tag_area) = area.split_horizontally(width.saturating_sub(tag_width));

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(font_px / 2)
        .x_label_area_size(font_px * 3)
        .y_label_area_size(font_px * 5)
        .build_cartesian_2d(panel.x_range.clone(), panel.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Position")
        .y_desc(panel.y_desc)
        .label_style((FONT_FAMILY, font_px))
        .axis_desc_style((FONT_FAMILY, font_px))
        .draw()?;

    for w in panel.shaded {
        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (w.start as f64, panel.y_range.start),
                (w.end as f64, panel.y_range.end),
            ],
            SHADE_COLOR.mix(0.3).filled(),
        )))?;
    }

    let coords = || panel.points.iter().map(|o| (o.position as f64, o.energy));
    chart.draw_series(LineSeries::new(coords(), &LINE_COLOR))?;
    chart.draw_series(coords().map(|c| Circle::new(c, 3, LINE_COLOR.filled())))?;

    if panel.labels {
        let style = (FONT_FAMILY, font_px)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(panel.points.iter().map(|o| {
            Text::new(
                format!("{} {}", o.position, o.residue),
                (o.position as f64, o.energy + config.label_offset),
                style.clone(),
            )
        }))?;
    }

    tag_area.draw(&Text::new(
        panel.tag.clone(),
        ((tag_width / 2) as i32, (height / 2) as i32),
        (FONT_FAMILY, font_px)
            .into_font()
            .transform(FontTransform::Rotate90)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    Ok(())
}

/// Axis range that never collapses to a single value.
fn padded_range(lo: f64, hi: f64) -> Range<f64> {
    if hi - lo < 1e-9 {
        (lo - 0.5)..(hi + 0.5)
    } else {
        lo..hi
    }
}
