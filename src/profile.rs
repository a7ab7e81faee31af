//! Loading per-residue ΔΔG profiles from FoldX-style tables.
//!
//! The table needs `chain`, `pos`, `res` and `dif_energy` columns. Rows of the
//! requested chain are coerced to numbers, filtered by position, sorted and
//! deduplicated into a [`Profile`].

use crate::error::{DdgError, Result};
use crate::regions::Window;
use crate::utils::{read_table, require_columns, TableFormat};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Columns the profile loader needs.
pub const PROFILE_COLUMNS: [&str; 4] = ["chain", "pos", "res", "dif_energy"];

/// One residue of the energy profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Residue position
    pub position: i64,
    /// Residue label, usually the one-letter code
    pub residue: String,
    /// Signed ΔΔG in kcal/mol
    pub energy: f64,
}

/// Which rows of the table make it into the profile.
#[derive(Debug, Clone)]
pub struct ProfileFilter {
    /// Chain identifier to keep
    pub chain: String,
    /// Legacy inclusive upper cap on positions, applied before `start`/`end`
    pub max_pos: Option<i64>,
    /// Inclusive lower bound on positions
    pub start: Option<i64>,
    /// Inclusive upper bound on positions
    pub end: Option<i64>,
}

impl Default for ProfileFilter {
    fn default() -> Self {
        Self {
            chain: String::from("B"),
            max_pos: None,
            start: None,
            end: None,
        }
    }
}

impl ProfileFilter {
    fn keeps(&self, pos: f64) -> bool {
        let below = |bound: Option<i64>| bound.map_or(true, |b| pos <= b as f64);
        let above = |bound: Option<i64>| bound.map_or(true, |b| pos >= b as f64);
        below(self.max_pos) && above(self.start) && below(self.end)
    }
}

/// The energy profile of one chain, sorted by unique position.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Chain the profile was taken from
    pub chain: String,
    /// Observations in ascending position order
    pub observations: Vec<Observation>,
    /// Smallest position in the profile
    pub pos_min: i64,
    /// Largest position in the profile
    pub pos_max: i64,
}

impl Profile {
    /// Build a profile from raw observations: stable sort by position, keep the
    /// first row of every position.
    ///
    /// Returns [`DdgError::EmptyProfile`] if there are no observations.
    pub fn new(chain: &str, mut observations: Vec<Observation>) -> Result<Self> {
        observations.sort_by_key(|o| o.position);
        observations.dedup_by_key(|o| o.position);

        let (pos_min, pos_max) = match (observations.first(), observations.last()) {
            (Some(first), Some(last)) => (first.position, last.position),
            _ => return Err(DdgError::EmptyProfile),
        };
        Ok(Self {
            chain: chain.to_string(),
            observations,
            pos_min,
            pos_max,
        })
    }

    /// Observations inside `window` after clamping it to the profile bounds.
    pub fn slice(&self, window: &Window) -> Vec<&Observation> {
        match window.clamp(self.pos_min, self.pos_max) {
            Some(w) => self
                .observations
                .iter()
                .filter(|o| w.contains(o.position))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Bounds of the whole profile as a window.
    pub fn span(&self) -> Window {
        Window::new(self.pos_min, self.pos_max)
    }
}

/// Smallest and largest energy among `observations`, or `None` if there are none.
pub fn energy_range<'a>(observations: impl IntoIterator<Item = &'a Observation>) -> Option<(f64, f64)> {
    observations.into_iter().fold(None, |acc, o| match acc {
        None => Some((o.energy, o.energy)),
        Some((lo, hi)) => Some((lo.min(o.energy), hi.max(o.energy))),
    })
}

/// Read a profile table from disk and reduce it to one chain.
pub fn load_profile(path: &Path, format: TableFormat, filter: &ProfileFilter) -> Result<Profile> {
    let df = read_table(path, format)?;
    require_columns(&df, &PROFILE_COLUMNS)?;
    profile_from_df(df, filter, path)
}

/// Reduce an already loaded table to a [`Profile`]. `source` only appears in error messages.
///
/// Rows whose `pos` or `dif_energy` is not a finite number, whose `pos` is not
/// a whole number, or whose `res` is missing, are dropped.
pub fn profile_from_df(df: DataFrame, filter: &ProfileFilter, source: &Path) -> Result<Profile> {
    let df_chain = df
        .lazy()
        .filter(col("chain").eq(lit(filter.chain.as_str())))
        .collect()?;
    if df_chain.height() == 0 {
        return Err(DdgError::EmptyChain {
            chain: filter.chain.clone(),
            path: source.to_path_buf(),
        });
    }

    let pos = df_chain
        .column("pos")?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let energy = df_chain
        .column("dif_energy")?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let res = df_chain.column("res")?.as_materialized_series().str()?;

    let observations: Vec<Observation> = pos
        .f64()?
        .into_iter()
        .zip(energy.f64()?.into_iter())
        .zip(res.into_iter())
        .filter_map(|((p, e), r)| match (p, e, r) {
            (Some(p), Some(e), Some(r))
                if p.is_finite() && p.fract() == 0.0 && e.is_finite() =>
            {
                Some((p, e, r))
            }
            _ => None,
        })
        .filter(|(p, _, _)| filter.keeps(*p))
        .map(|(p, e, r)| Observation {
            position: p as i64,
            residue: r.to_string(),
            energy: e,
        })
        .collect();
    debug!(
        "Kept {} of {} rows for chain {}",
        observations.len(),
        df_chain.height(),
        filter.chain
    );

    Profile::new(&filter.chain, observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn summary_table() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        let rows = [
            "chain\tpos\tres\tdif_energy",
            "A\t1\tM\t0.5",
            "B\t12\tK\t1.5",
            "B\t10\tG\t-0.2",
            "B\t11\tL\tnot-a-number",
            "B\t10\tA\t9.9",
            "B\t40\tW\t-3.1",
            "B\t55\tY\t0.7",
            "B\tx\tF\t2.0",
        ];
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_sorts_and_deduplicates() {
        let file = summary_table();
        let profile = load_profile(file.path(), TableFormat::Tsv, &ProfileFilter::default()).unwrap();

        let positions: Vec<i64> = profile.observations.iter().map(|o| o.position).collect();
        assert_eq!(positions, [10, 12, 40, 55]);
        assert_eq!(profile.observations[0].residue, "G");
        assert_eq!(profile.observations[0].energy, -0.2);
        assert_eq!((profile.pos_min, profile.pos_max), (10, 55));
    }

    #[test]
    fn load_applies_position_bounds() {
        let file = summary_table();
        let filter = ProfileFilter {
            start: Some(11),
            end: Some(50),
            ..Default::default()
        };
        let profile = load_profile(file.path(), TableFormat::Tsv, &filter).unwrap();
        let positions: Vec<i64> = profile.observations.iter().map(|o| o.position).collect();
        assert_eq!(positions, [12, 40]);

        let filter = ProfileFilter {
            max_pos: Some(12),
            ..Default::default()
        };
        let profile = load_profile(file.path(), TableFormat::Tsv, &filter).unwrap();
        assert_eq!(profile.pos_max, 12);
    }

    #[test]
    fn fractional_positions_are_dropped() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for row in [
            "chain,pos,res,dif_energy",
            "B,10.2,G,1.0",
            "B,10.7,A,2.0",
            "B,11.0,L,3.0",
            "B,12,K,4.0",
        ] {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();

        let profile = load_profile(file.path(), TableFormat::Csv, &ProfileFilter::default()).unwrap();
        let positions: Vec<i64> = profile.observations.iter().map(|o| o.position).collect();
        assert_eq!(positions, [11, 12]);
        assert_eq!(profile.observations[0].residue, "L");
    }

    #[test]
    fn load_reports_empty_results() {
        let file = summary_table();
        let filter = ProfileFilter {
            chain: String::from("C"),
            ..Default::default()
        };
        match load_profile(file.path(), TableFormat::Tsv, &filter) {
            Err(DdgError::EmptyChain { chain, path }) => {
                assert_eq!(chain, "C");
                assert_eq!(path, file.path());
            }
            other => panic!("expected empty chain, got {other:?}"),
        }

        let filter = ProfileFilter {
            start: Some(100),
            ..Default::default()
        };
        assert!(matches!(
            load_profile(file.path(), TableFormat::Tsv, &filter),
            Err(DdgError::EmptyProfile)
        ));
    }

    #[test]
    fn load_requires_energy_column() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "chain\tpos\tres").unwrap();
        writeln!(file, "B\t1\tG").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            load_profile(file.path(), TableFormat::Tsv, &ProfileFilter::default()),
            Err(DdgError::MissingColumns { .. })
        ));
    }

    #[test]
    fn slices_are_clamped() {
        let observations = [(5, 1.0), (6, -2.0), (8, 0.5)]
            .into_iter()
            .map(|(position, energy)| Observation {
                position,
                residue: "A".to_string(),
                energy,
            })
            .collect();
        let profile = Profile::new("A", observations).unwrap();

        let slice = profile.slice(&Window::new(0, 6));
        assert_eq!(slice.len(), 2);
        assert!(profile.slice(&Window::new(20, 30)).is_empty());
        assert_eq!(energy_range(slice), Some((-2.0, 1.0)));
        assert_eq!(energy_range(std::iter::empty::<&Observation>()), None);
    }
}
