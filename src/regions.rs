//! Named zoom windows over residue positions.
//!
//! Windows come either from a user supplied spec (`Name:start-end,...`) or
//! from the greedy hotspot selector, which centers windows on the positions
//! with the largest |ΔΔG|.

use crate::error::{DdgError, Result};
use crate::profile::{Observation, Profile};
use std::fmt;
use tracing::info;

/// An inclusive range of residue positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// First position in the window
    pub start: i64,
    /// Last position in the window
    pub end: i64,
}

impl Window {
    /// Create a window, swapping the bounds if they are reversed.
    pub fn new(start: i64, end: i64) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Whether the two windows overlap or are separated by a single position.
    pub fn touches(&self, other: &Window) -> bool {
        !(self.end < other.start.saturating_sub(1) || self.start > other.end.saturating_add(1))
    }

    /// The smallest window covering both.
    pub fn union(&self, other: &Window) -> Window {
        Window {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Restrict the window to `[lo, hi]`. Returns `None` if nothing is left.
    pub fn clamp(&self, lo: i64, hi: i64) -> Option<Window> {
        let start = self.start.max(lo);
        let end = self.end.min(hi);
        (start <= end).then_some(Window { start, end })
    }

    /// Whether `pos` falls inside the window.
    pub fn contains(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Ordered mapping from region name to [`Window`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSet {
    regions: Vec<(String, Window)>,
}

impl RegionSet {
    /// An empty region set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single region spanning `[pos_min, pos_max]`, used when nothing else was selected.
    pub fn fallback(pos_min: i64, pos_max: i64) -> Self {
        let mut regions = Self::new();
        regions.insert("Region1", Window::new(pos_min, pos_max));
        regions
    }

    /// Insert a region. A repeated name replaces the earlier window in place.
    pub fn insert(&mut self, name: impl Into<String>, window: Window) {
        let name = name.into();
        match self.regions.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = window,
            None => self.regions.push((name, window)),
        }
    }

    /// Look up a region by name.
    pub fn get(&self, name: &str) -> Option<&Window> {
        self.regions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| w)
    }

    /// Iterate over `(name, window)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Window)> {
        self.regions.iter().map(|(n, w)| (n.as_str(), w))
    }

    /// Iterate over the windows in order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.regions.iter().map(|(_, w)| w)
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether there are no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Substitute the full-span fallback if the set is empty.
    pub fn or_fallback(self, pos_min: i64, pos_max: i64) -> Self {
        if self.is_empty() {
            Self::fallback(pos_min, pos_max)
        } else {
            self
        }
    }
}

/// Parse a region spec string such as `"Name1:10-20,Name2:30-40"`.
///
/// Empty tokens are skipped and reversed bounds are swapped. Any token that is
/// not of the form `Name:start-end` fails with [`DdgError::InvalidRegion`]
/// carrying the token verbatim.
pub fn parse_regions(spec: &str) -> Result<RegionSet> {
    let mut regions = RegionSet::new();
    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, window) =
            parse_region_token(token).ok_or_else(|| DdgError::InvalidRegion(token.to_string()))?;
        regions.insert(name, window);
    }
    Ok(regions)
}

/// Parse an optional region spec. A missing or empty spec means "no named regions".
pub fn parse_region_option(spec: Option<&str>) -> Result<Option<RegionSet>> {
    spec.filter(|s| !s.is_empty())
        .map(parse_regions)
        .transpose()
}

/// Decide which regions of `profile` to zoom into.
///
/// Named regions win over auto-selection. An empty result becomes the
/// full-span fallback window.
pub fn select_regions(
    named: Option<RegionSet>,
    profile: &Profile,
    k: usize,
    width: usize,
) -> RegionSet {
    let regions = named.unwrap_or_else(|| {
        auto_hotspot_windows(&profile.observations, k, width, profile.pos_min, profile.pos_max)
    });
    if regions.is_empty() {
        info!("No regions selected, zooming into the full profile");
    }
    regions.or_fallback(profile.pos_min, profile.pos_max)
}

fn parse_region_token(token: &str) -> Option<(&str, Window)> {
    let (name, range) = token.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let (start, end) = range.split_once('-')?;
    Some((name, Window::new(parse_position(start)?, parse_position(end)?)))
}

fn parse_position(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Pick up to `k` windows of roughly `width` positions around the largest |ΔΔG| values.
///
/// Observations are ranked by absolute energy (stable, so ties keep the input
/// order). Each ranked position proposes `(p - half, p + half)` with
/// `half = max(1, width / 2)`. The proposal is merged into the *first*
/// accepted window it overlaps or touches; otherwise it becomes a new window.
/// Selection stops once `k` windows have been accepted. The result is clamped
/// to `[pos_min, pos_max]`, sorted by start and named `Region1..RegionN`.
///
/// Returns an empty set for `k == 0` or no observations.
pub fn auto_hotspot_windows(
    observations: &[Observation],
    k: usize,
    width: usize,
    pos_min: i64,
    pos_max: i64,
) -> RegionSet {
    if k == 0 || observations.is_empty() {
        return RegionSet::new();
    }

    let half = i64::try_from(width / 2).unwrap_or(i64::MAX).max(1);
    let mut ranked: Vec<&Observation> = observations.iter().collect();
    ranked.sort_by(|a, b| b.energy.abs().total_cmp(&a.energy.abs()));

    let mut windows: Vec<Window> = Vec::new();
    for obs in ranked {
        let candidate = Window {
            start: obs.position.saturating_sub(half),
            end: obs.position.saturating_add(half),
        };
        match windows.iter_mut().find(|w| candidate.touches(w)) {
            Some(w) => *w = w.union(&candidate),
            None => windows.push(candidate),
        }
        if windows.len() >= k {
            break;
        }
    }

    let mut windows: Vec<Window> = windows
        .iter()
        .filter_map(|w| w.clamp(pos_min, pos_max))
        .collect();
    windows.sort_by_key(|w| w.start);

    let mut regions = RegionSet::new();
    for (i, w) in windows.into_iter().enumerate() {
        regions.insert(format!("Region{}", i + 1), w);
    }
    regions
}
