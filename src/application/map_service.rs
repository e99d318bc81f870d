// Map service - Use case for placing a batch and rendering the artifact
use crate::application::map_renderer::{MapRenderer, MapView, ZOOM_HINT};
use crate::domain::placement::{self, PlacementMode};
use crate::domain::sample::Batch;
use crate::error::PipelineError;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct MapService {
    renderer: Arc<dyn MapRenderer>,
}

impl MapService {
    pub fn new(renderer: Arc<dyn MapRenderer>) -> Self {
        Self { renderer }
    }

    /// Place every sample, then hand the view to the renderer.
    pub fn render_batch(
        &self,
        batch: &Batch,
        mode: PlacementMode,
        base_offset: f64,
        output: &Path,
    ) -> Result<(), PipelineError> {
        let markers = placement::place(batch, mode, base_offset)?;
        let view = MapView {
            center: batch.center(),
            zoom_hint: ZOOM_HINT,
            mode,
            markers,
            track: batch.track(),
        };
        self.renderer.render(&view, output)?;
        tracing::info!(
            points = batch.len(),
            output = %output.display(),
            "map rendered"
        );
        Ok(())
    }
}
