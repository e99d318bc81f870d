// Placement engine - Display position, color and label per sample
use crate::domain::sample::{Batch, Sample};
use crate::error::PipelineError;
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::str::FromStr;

/// Default angular-offset radius in degrees (~2.2 m at the equator).
pub const DEFAULT_BASE_OFFSET: f64 = 0.00002;

/// Points per offset ring in spread mode; each full ring moves the next
/// points one radius step further out.
const RING_CAPACITY: usize = 8;

/// Coordinates are grouped on a 5-decimal grid (~1.1 m); samples in the
/// same cell are treated as coincident.
const GRID_SCALE: f64 = 1e5;

/// How overlapping markers are separated on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    /// Deterministic angular offsets computed here, no renderer assistance.
    Spread,
    /// True positions; de-overlap is delegated to the renderer's
    /// proximity clustering.
    Cluster,
}

impl FromStr for PlacementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spread" => Ok(Self::Spread),
            "cluster" => Ok(Self::Cluster),
            other => Err(format!("unknown placement mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Green,
    Orange,
    Blue,
}

impl MarkerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Blue => "blue",
        }
    }
}

/// A sample prepared for rendering. Lives only for the duration of one
/// rendering call; the underlying sample is never mutated.
#[derive(Debug, Clone)]
pub struct PlacedPoint {
    pub display_latitude: f64,
    pub display_longitude: f64,
    pub color: MarkerColor,
    pub tooltip: String,
    pub popup: String,
}

/// Color classification by inclination magnitude.
///
/// The thresholds are deliberately asymmetric: only a tilt beyond 0.5°
/// backwards is orange, while forward tilt of any size (and exactly -0.5°)
/// is blue. Keep the branches exactly as they are.
pub fn classify(inclination: f64) -> MarkerColor {
    if inclination.abs() < 0.5 {
        MarkerColor::Green
    } else if inclination < -0.5 {
        MarkerColor::Orange
    } else {
        MarkerColor::Blue
    }
}

/// Compute display positions, colors and label text for every sample.
///
/// In spread mode, samples sharing a grid cell are fanned out on rings of
/// [`RING_CAPACITY`] around the true position; singletons stay put. Labels
/// always show the true coordinates regardless of where the marker is
/// pinned.
pub fn place(
    batch: &Batch,
    mode: PlacementMode,
    base_offset: f64,
) -> Result<Vec<PlacedPoint>, PipelineError> {
    let samples = batch.samples();
    if samples.is_empty() {
        return Err(PipelineError::EmptyBatch);
    }

    let mut offsets = vec![(0.0, 0.0); samples.len()];
    if mode == PlacementMode::Spread {
        let mut groups: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, sample) in samples.iter().enumerate() {
            groups.entry(grid_cell(sample)).or_default().push(i);
        }
        for members in groups.values() {
            if members.len() < 2 {
                continue;
            }
            for (pos, &i) in members.iter().enumerate() {
                let angle = TAU * pos as f64 / members.len() as f64;
                let radius = base_offset * (1.0 + (pos / RING_CAPACITY) as f64);
                offsets[i] = (angle.cos() * radius, angle.sin() * radius);
            }
        }
    }

    Ok(samples
        .iter()
        .zip(offsets)
        .map(|(sample, (dlat, dlon))| placed_point(sample, dlat, dlon))
        .collect())
}

fn grid_cell(sample: &Sample) -> (i64, i64) {
    (
        (sample.latitude * GRID_SCALE).round() as i64,
        (sample.longitude * GRID_SCALE).round() as i64,
    )
}

fn placed_point(sample: &Sample, dlat: f64, dlon: f64) -> PlacedPoint {
    // "+" for non-negative; the negative sign comes from the number itself.
    let sign = if sample.inclination >= 0.0 { "+" } else { "" };
    let tooltip = format!("#{}: {}{:.2}°", sample.index, sign, sample.inclination);
    let popup = format!(
        "<b>Entry #{}</b><br>\
         <b>DateTime:</b> {}<br>\
         <b>Latitude:</b> {:.6}<br>\
         <b>Longitude:</b> {:.6}<br>\
         <b>Inclination:</b> {}{:.2}°",
        sample.index, sample.date_time, sample.latitude, sample.longitude, sign, sample.inclination,
    );
    PlacedPoint {
        display_latitude: sample.latitude + dlat,
        display_longitude: sample.longitude + dlon,
        color: classify(sample.inclination),
        tooltip,
        popup,
    }
}
