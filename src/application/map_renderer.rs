// Renderer contract for map artifacts
use crate::domain::placement::{PlacedPoint, PlacementMode};
use crate::error::PipelineError;
use std::path::Path;

/// Initial zoom passed to the renderer. A hint only; renderers clamp it to
/// whatever their tile source supports.
pub const ZOOM_HINT: u8 = 30;

/// Everything a renderer needs to produce one map artifact: a center, a
/// zoom hint, placed markers, and the ordered track through the true
/// coordinates.
#[derive(Debug, Clone)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom_hint: u8,
    pub mode: PlacementMode,
    pub markers: Vec<PlacedPoint>,
    pub track: Vec<(f64, f64)>,
}

/// Opaque rendering sink. Implementations turn a [`MapView`] into a single
/// self-contained artifact file; swapping the implementation must not
/// affect placement or codec logic.
pub trait MapRenderer: Send + Sync {
    fn render(&self, view: &MapView, output: &Path) -> Result<(), PipelineError>;
}
