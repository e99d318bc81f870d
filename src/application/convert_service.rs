// Convert service - Use case for turning a stored batch into a map
use crate::application::map_service::MapService;
use crate::domain::placement::PlacementMode;
use crate::error::PipelineError;
use crate::infrastructure::batch_store;
use crate::infrastructure::csv_codec;
use crate::infrastructure::payload;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Result of a successful conversion.
#[derive(Debug)]
pub struct RenderedMap {
    pub path: PathBuf,
    pub points: usize,
    pub skipped_rows: usize,
}

#[derive(Clone)]
pub struct ConvertService {
    map_service: MapService,
}

impl ConvertService {
    pub fn new(map_service: MapService) -> Self {
        Self { map_service }
    }

    /// Render a map from an externally supplied source file.
    ///
    /// A `.json` source (a stored raw batch) is first converted to a
    /// collision-safe sibling CSV; anything else is read as CSV directly.
    pub fn convert_and_render(
        &self,
        source: &Path,
        output: &Path,
        mode: PlacementMode,
        base_offset: f64,
    ) -> Result<RenderedMap, PipelineError> {
        if !source.exists() {
            return Err(PipelineError::SourceNotFound(source.to_path_buf()));
        }

        let csv_path = if has_extension(source, "json") {
            let raw = fs::read(source)?;
            let payload = payload::parse_payload(&raw)?;
            let csv_path = batch_store::unique_sibling_csv(source);
            csv_codec::encode_payload(&payload, File::create(&csv_path)?)?;
            tracing::info!(csv = %csv_path.display(), "converted raw batch to CSV");
            csv_path
        } else {
            source.to_path_buf()
        };

        let decoded = csv_codec::decode(File::open(&csv_path)?)?;
        tracing::info!(
            samples = decoded.batch.len(),
            skipped = decoded.warnings.len(),
            source = %csv_path.display(),
            "batch loaded"
        );

        self.map_service
            .render_batch(&decoded.batch, mode, base_offset, output)?;

        Ok(RenderedMap {
            path: output.to_path_buf(),
            points: decoded.batch.len(),
            skipped_rows: decoded.warnings.len(),
        })
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Newest `collected_data_*` file in `dir` by descending name sort, the
/// converter's default source when none is given.
pub fn latest_collected_source(dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("collected_data_"))
        })
        .collect();
    candidates.sort();
    candidates.pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::placement::DEFAULT_BASE_OFFSET;
    use crate::infrastructure::leaflet_renderer::LeafletRenderer;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn service() -> ConvertService {
        ConvertService::new(MapService::new(Arc::new(LeafletRenderer)))
    }

    #[test]
    fn test_missing_source_is_source_not_found() {
        let dir = tempdir().unwrap();
        let result = service().convert_and_render(
            &dir.path().join("nope.csv"),
            &dir.path().join("out.html"),
            PlacementMode::Spread,
            DEFAULT_BASE_OFFSET,
        );
        assert!(matches!(result, Err(PipelineError::SourceNotFound(_))));
    }

    #[test]
    fn test_csv_source_renders_map() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("collected_data_1.csv");
        fs::write(
            &source,
            "Index,DateTime,Latitude,Longitude,Inclination(degrees)\n\
             0,t0,10.0,20.0,0.2\n\
             1,t1,10.0,20.0,-1.0\n\
             2,t2,10.00002,20.00002,1.0\n",
        )
        .unwrap();

        let output = dir.path().join("maps/gps_map.html");
        let rendered = service()
            .convert_and_render(&source, &output, PlacementMode::Spread, DEFAULT_BASE_OFFSET)
            .unwrap();

        assert_eq!(rendered.points, 3);
        assert_eq!(rendered.skipped_rows, 0);
        assert!(output.exists());
    }

    #[test]
    fn test_json_source_converts_to_sibling_csv_first() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("collected_data_1.json");
        fs::write(
            &source,
            br#"{"data":[{"index":0,"dateTime":"t0","latitude":10.0,"longitude":20.0,"inclination":0.2}]}"#,
        )
        .unwrap();

        let output = dir.path().join("out.html");
        let rendered = service()
            .convert_and_render(&source, &output, PlacementMode::Cluster, DEFAULT_BASE_OFFSET)
            .unwrap();

        assert_eq!(rendered.points, 1);
        assert!(dir.path().join("collected_data_1.csv").exists());
        assert!(output.exists());
    }

    #[test]
    fn test_all_invalid_rows_fail_with_empty_batch() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("collected_data_1.csv");
        fs::write(
            &source,
            "Index,DateTime,Latitude,Longitude,Inclination(degrees)\nx,t0,a,b,c\n",
        )
        .unwrap();

        let result = service().convert_and_render(
            &source,
            &dir.path().join("out.html"),
            PlacementMode::Spread,
            DEFAULT_BASE_OFFSET,
        );
        assert!(matches!(result, Err(PipelineError::EmptyBatch)));
    }

    #[test]
    fn test_latest_collected_source_by_name_sort() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("collected_data_001.csv"), "x").unwrap();
        fs::write(dir.path().join("collected_data_003.csv"), "x").unwrap();
        fs::write(dir.path().join("collected_data_002.csv"), "x").unwrap();
        fs::write(dir.path().join("other.csv"), "x").unwrap();

        assert_eq!(
            latest_collected_source(dir.path()),
            Some(dir.path().join("collected_data_003.csv"))
        );
    }

    #[test]
    fn test_latest_collected_source_empty_dir() {
        let dir = tempdir().unwrap();
        assert_eq!(latest_collected_source(dir.path()), None);
    }
}
