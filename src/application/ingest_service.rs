// Ingest service - Use case for a batch received over the network
use crate::application::map_service::MapService;
use crate::domain::placement::PlacementMode;
use crate::error::PipelineError;
use crate::infrastructure::batch_store::FsBatchStore;
use crate::infrastructure::csv_codec;
use crate::infrastructure::payload;
use std::fs::File;
use std::path::PathBuf;

/// What one ingestion produced. `map_path` is `None` when rendering was
/// skipped because no valid sample survived decoding.
#[derive(Debug)]
pub struct IngestOutcome {
    pub raw_path: PathBuf,
    pub csv_path: PathBuf,
    pub map_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct IngestService {
    store: FsBatchStore,
    map_service: MapService,
    created_dir: PathBuf,
    mode: PlacementMode,
    base_offset: f64,
}

impl IngestService {
    pub fn new(
        store: FsBatchStore,
        map_service: MapService,
        created_dir: impl Into<PathBuf>,
        mode: PlacementMode,
        base_offset: f64,
    ) -> Self {
        Self {
            store,
            map_service,
            created_dir: created_dir.into(),
            mode,
            base_offset,
        }
    }

    /// Persist an incoming raw batch, then render its map.
    ///
    /// The raw/tabular pair is written before any decoding, so even an
    /// entirely malformed batch is kept for inspection. An empty batch is
    /// persisted but produces no map; that is not a failure here.
    pub fn ingest(&self, body: &[u8]) -> Result<IngestOutcome, PipelineError> {
        let payload = payload::parse_payload(body)?;
        let stored = self.store.persist(body, &payload)?;
        tracing::info!(raw = %stored.raw_path.display(), "batch received");

        let map_path = match csv_codec::decode(File::open(&stored.csv_path)?) {
            Ok(decoded) => {
                let map_path = self.created_dir.join(format!("map_{}.html", stored.stamp));
                self.map_service
                    .render_batch(&decoded.batch, self.mode, self.base_offset, &map_path)?;
                Some(map_path)
            }
            Err(PipelineError::EmptyBatch) => {
                tracing::warn!("no valid samples in batch, skipping map generation");
                None
            }
            Err(other) => return Err(other),
        };

        Ok(IngestOutcome {
            raw_path: stored.raw_path,
            csv_path: stored.csv_path,
            map_path,
        })
    }
}
